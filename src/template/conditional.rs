//! Conditional block parsing and resolution.
//!
//! Templates may guard regions with `{{#if expr}}...{{/if}}`, where `expr`
//! is one of:
//!
//! - `variable` - kept when the variable is truthy
//! - `variable == "literal"` - kept when the value equals the literal
//! - `variable != "literal"` - kept when the value differs from the literal
//!
//! Blocks are found with a flat single-pass scan. Nesting is rejected, as
//! are unbalanced markers; every offending marker is reported at once.
//!
//! A value is truthy when it is set and, trimmed, is neither empty nor one
//! of `false`, `0` or `no` (case-insensitive). An UNSET variable is never
//! equal to a literal, so `!=` holds for it.

use super::error::{ConditionalIssue, ConditionalIssueKind, LiteralIssue, TemplateError};
use super::prompt_context::PromptContext;
use super::registry::get_enum_values;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{#if(?:\s+(?P<expr>[^}]*?))?\s*\}\}|\{\{/if\s*\}\}")
        .expect("Invalid conditional marker regex")
});

static EXPR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<var>[A-Za-z][A-Za-z0-9_.]*)(?:\s*(?P<op>==|!=)\s*"(?P<lit>[^"]*)")?$"#)
        .expect("Invalid condition expression regex")
});

const FALSY_VALUES: &[&str] = &["false", "0", "no"];

/// How a block's guard is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    /// Bare variable name.
    Truthy,
    /// `variable == "literal"`.
    Equals,
    /// `variable != "literal"`.
    NotEquals,
}

/// A matched `{{#if}}...{{/if}}` region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalBlock {
    /// The guard operator.
    pub operator: ConditionOperator,
    /// The variable the guard tests.
    pub variable: String,
    /// The comparison literal (`None` for truthy guards).
    pub literal: Option<String>,
    /// Text between the markers.
    pub body: String,
    /// Byte span of the whole block, markers included.
    pub span: Range<usize>,
}

struct Guard {
    operator: ConditionOperator,
    variable: String,
    literal: Option<String>,
}

struct OpenMarker {
    start: usize,
    body_start: usize,
    guard: Option<Guard>,
}

/// Find every conditional block in `source`, in document order.
///
/// # Errors
///
/// [`TemplateError::Conditional`] listing every unmatched `{{/if}}`,
/// unclosed or nested `{{#if}}`, and malformed guard expression.
pub fn parse_conditional_blocks(source: &str) -> Result<Vec<ConditionalBlock>, TemplateError> {
    let mut blocks = Vec::new();
    let mut issues = Vec::new();
    let mut open: Option<OpenMarker> = None;
    // Opens seen inside the current block; each consumes one close.
    let mut nested = 0usize;

    for caps in MARKER_REGEX.captures_iter(source) {
        let Some(marker) = caps.get(0) else {
            continue;
        };

        if marker.as_str().starts_with("{{#if") {
            if open.is_some() {
                issues.push(issue(source, ConditionalIssueKind::Nested, marker.start()));
                nested += 1;
                continue;
            }

            let expr = caps.name("expr").map_or("", |m| m.as_str().trim());
            let guard = match parse_expression(expr) {
                Some(guard) => Some(guard),
                None => {
                    issues.push(issue(
                        source,
                        ConditionalIssueKind::InvalidExpression(expr.to_string()),
                        marker.start(),
                    ));
                    None
                }
            };
            open = Some(OpenMarker {
                start: marker.start(),
                body_start: marker.end(),
                guard,
            });
        } else if nested > 0 {
            nested -= 1;
        } else {
            match open.take() {
                Some(OpenMarker {
                    start,
                    body_start,
                    guard: Some(guard),
                }) => blocks.push(ConditionalBlock {
                    operator: guard.operator,
                    variable: guard.variable,
                    literal: guard.literal,
                    body: source[body_start..marker.start()].to_string(),
                    span: start..marker.end(),
                }),
                Some(_) => {}
                None => issues.push(issue(
                    source,
                    ConditionalIssueKind::UnmatchedClose,
                    marker.start(),
                )),
            }
        }
    }

    if let Some(unclosed) = open {
        issues.push(issue(source, ConditionalIssueKind::Unclosed, unclosed.start));
    }

    if issues.is_empty() {
        Ok(blocks)
    } else {
        issues.sort_by_key(|i| i.position);
        Err(TemplateError::Conditional { issues })
    }
}

fn parse_expression(expr: &str) -> Option<Guard> {
    let caps = EXPR_REGEX.captures(expr)?;
    let variable = caps.name("var")?.as_str().to_string();
    let literal = caps.name("lit").map(|m| m.as_str().to_string());
    let operator = match caps.name("op").map(|m| m.as_str()) {
        None => ConditionOperator::Truthy,
        Some("==") => ConditionOperator::Equals,
        Some(_) => ConditionOperator::NotEquals,
    };
    Some(Guard {
        operator,
        variable,
        literal,
    })
}

fn issue(source: &str, kind: ConditionalIssueKind, position: usize) -> ConditionalIssue {
    ConditionalIssue {
        kind,
        position,
        line: source[..position].matches('\n').count() + 1,
    }
}

/// Check comparison literals against the enum members of their variables.
///
/// Comparisons on non-enum or unknown variables are not checked here.
pub fn check_enum_literals(blocks: &[ConditionalBlock]) -> Vec<LiteralIssue> {
    blocks
        .iter()
        .filter_map(|block| {
            let literal = block.literal.as_ref()?;
            let allowed = get_enum_values(&block.variable)?;
            if allowed.contains(&literal.as_str()) {
                None
            } else {
                Some(LiteralIssue {
                    variable: block.variable.clone(),
                    literal: literal.clone(),
                    allowed,
                    position: block.span.start,
                })
            }
        })
        .collect()
}

/// Whether a context value counts as true for a bare guard.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !FALSY_VALUES.iter().any(|f| value.eq_ignore_ascii_case(f))
}

/// Evaluate a block's guard against a context.
pub fn evaluate_condition(block: &ConditionalBlock, context: &PromptContext) -> bool {
    let value = context.get_by_name(&block.variable);
    match block.operator {
        ConditionOperator::Truthy => value.is_some_and(is_truthy),
        ConditionOperator::Equals => value.is_some() && value == block.literal.as_deref(),
        ConditionOperator::NotEquals => value.is_none() || value != block.literal.as_deref(),
    }
}

/// Resolve every conditional block in `source` against a context.
///
/// Blocks whose guard holds are replaced by their body; the rest are
/// removed entirely, markers included.
pub fn resolve_conditionals(
    source: &str,
    context: &PromptContext,
) -> Result<String, TemplateError> {
    let blocks = parse_conditional_blocks(source)?;
    Ok(resolve_blocks(source, &blocks, context))
}

/// Resolve pre-parsed blocks (as returned by [`parse_conditional_blocks`]
/// for the same `source`).
pub(crate) fn resolve_blocks(
    source: &str,
    blocks: &[ConditionalBlock],
    context: &PromptContext,
) -> String {
    splice_blocks(source, blocks, |block| evaluate_condition(block, context))
}

/// Replace each block by its body when `keep` holds, drop it otherwise.
pub(crate) fn splice_blocks(
    source: &str,
    blocks: &[ConditionalBlock],
    mut keep: impl FnMut(&ConditionalBlock) -> bool,
) -> String {
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for block in blocks {
        output.push_str(&source[cursor..block.span.start]);
        if keep(block) {
            output.push_str(&block.body);
        }
        cursor = block.span.end;
    }
    output.push_str(&source[cursor..]);

    output
}
