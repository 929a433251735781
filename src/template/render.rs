//! Prompt rendering with a two-way variable contract.
//!
//! Rendering resolves conditional blocks first, then checks the placeholders
//! that survive resolution:
//!
//! - every surviving placeholder must have a value (always enforced)
//! - in strict mode, every value in the context must be consumed, either by
//!   a surviving placeholder or by a conditional guard
//!
//! Both checks report the complete list of offending names. Substitution is
//! a single pass, so substituted values are never re-scanned for
//! placeholders.

use super::conditional::resolve_blocks;
use super::error::TemplateError;
use super::parser::{PLACEHOLDER_REGEX, ParsedTemplate, extract_variables};
use super::prompt_context::PromptContext;
use regex::Captures;

/// Options for [`render_prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Reject context values the template does not use.
    pub strict: bool,
}

impl RenderOptions {
    /// Strict rendering (the default).
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Partial-context rendering: unused context values are allowed.
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// Render a parsed template against a context.
///
/// # Errors
///
/// - [`TemplateError::MissingVariables`] when surviving placeholders are UNSET
/// - [`TemplateError::UnusedVariables`] in strict mode when context values
///   go unused
///
/// No partial output is ever returned.
pub fn render_prompt(
    template: &ParsedTemplate,
    context: &PromptContext,
    options: RenderOptions,
) -> Result<String, TemplateError> {
    let resolved = resolve_blocks(template.source(), template.conditionals(), context);
    let live = extract_variables(&resolved);

    let missing: Vec<String> = live
        .iter()
        .filter(|name| context.get_by_name(name).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::MissingVariables { names: missing });
    }

    if options.strict {
        let guards = template.guard_variables();
        let mut unused: Vec<String> = context
            .defined()
            .map(|(var, _)| var.name())
            .filter(|name| !live.contains(*name) && !guards.contains(name))
            .map(String::from)
            .collect();
        if !unused.is_empty() {
            unused.sort();
            return Err(TemplateError::UnusedVariables { names: unused });
        }
    }

    Ok(substitute(&resolved, context))
}

fn substitute(text: &str, context: &PromptContext) -> String {
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures| {
            context.get_by_name(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}
