//! Template parsing and variable validation.
//!
//! Parsing extracts every `{{ name }}` placeholder, finds the conditional
//! blocks, and validates all referenced names (placeholders and guards,
//! including those inside branches that a given render may drop) against
//! the variable registry.

use super::conditional::{
    ConditionalBlock, check_enum_literals, parse_conditional_blocks, splice_blocks,
};
use super::error::TemplateError;
use super::registry::is_valid_variable;
use crate::snapshot::compute_template_version;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// `{{`, optional whitespace, identifier, optional whitespace, `}}`.
pub(super) static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_.]*)\s*\}\}").expect("Invalid placeholder regex")
});

/// A validated template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    name: Option<String>,
    source: String,
    variables: BTreeSet<String>,
    conditionals: Vec<ConditionalBlock>,
}

impl ParsedTemplate {
    /// The template name (filename without extension when loaded from disk).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The raw template source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every placeholder name in the source, sorted and deduplicated.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    /// The conditional blocks, in document order.
    pub fn conditionals(&self) -> &[ConditionalBlock] {
        &self.conditionals
    }

    /// Variables tested by conditional guards.
    pub fn guard_variables(&self) -> BTreeSet<&str> {
        self.conditionals
            .iter()
            .map(|block| block.variable.as_str())
            .collect()
    }

    /// Fingerprint of the raw source (see [`compute_template_version`]).
    pub fn version(&self) -> String {
        compute_template_version(&self.source)
    }
}

/// Extract placeholder names from a template source.
///
/// Pure and stateless: the result depends only on `source`.
pub fn extract_variables(source: &str) -> BTreeSet<String> {
    PLACEHOLDER_REGEX
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse and validate a template.
///
/// # Errors
///
/// - [`TemplateError::Conditional`] for unbalanced, nested or malformed
///   conditional markers
/// - [`TemplateError::UnknownVariables`] listing every name outside the
///   registry
/// - [`TemplateError::InvalidLiterals`] for enum comparisons against
///   non-members
pub fn parse_template(source: &str, name: Option<&str>) -> Result<ParsedTemplate, TemplateError> {
    let conditionals = parse_conditional_blocks(source)?;
    let variables = extract_variables(source);

    // Text on either side of a block can join into a placeholder once the
    // block is spliced out, so names from both splicings are checked too.
    let spliced: BTreeSet<String> = [true, false]
        .into_iter()
        .flat_map(|keep| extract_variables(&splice_blocks(source, &conditionals, |_| keep)))
        .collect();

    let unknown: BTreeSet<&str> = variables
        .iter()
        .chain(spliced.iter())
        .map(String::as_str)
        .chain(conditionals.iter().map(|block| block.variable.as_str()))
        .filter(|name| !is_valid_variable(name))
        .collect();
    if !unknown.is_empty() {
        return Err(TemplateError::UnknownVariables {
            names: unknown.into_iter().map(String::from).collect(),
        });
    }

    let literals = check_enum_literals(&conditionals);
    if !literals.is_empty() {
        return Err(TemplateError::InvalidLiterals { literals });
    }

    Ok(ParsedTemplate {
        name: name.map(String::from),
        source: source.to_string(),
        variables,
        conditionals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_variables_sorted_and_unique() {
        let vars = extract_variables("{{topic.entity}} {{ research.runId }} {{topic.entity}}");
        let vars: Vec<&str> = vars.iter().map(String::as_str).collect();
        assert_eq!(vars, vec!["research.runId", "topic.entity"]);
    }

    #[test]
    fn test_extract_variables_ignores_non_identifiers() {
        let vars = extract_variables("{{#if topic.claim}}{{/if}} {{1abc}} {{}} {{ a b }} {single}");
        assert!(vars.is_empty());
    }

    #[test]
    fn test_extract_variables_is_stateless() {
        let source = "{{topic.entity}}";
        assert_eq!(extract_variables(source), extract_variables(source));
        assert_eq!(extract_variables(source).len(), 1);
    }

    #[test]
    fn test_parse_valid_template() {
        let template = parse_template(
            "Research {{topic.entity}} for run {{research.runId}}.",
            Some("deep-research"),
        )
        .unwrap();

        assert_eq!(template.name(), Some("deep-research"));
        assert_eq!(template.variables().len(), 2);
        assert!(template.variables().contains("topic.entity"));
        assert!(template.conditionals().is_empty());
    }

    #[test]
    fn test_parse_unknown_variable() {
        let err = parse_template("{{bogus.var}}", None).unwrap_err();
        match err {
            TemplateError::UnknownVariables { names } => assert_eq!(names, vec!["bogus.var"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_reports_all_unknown_variables() {
        let source = "{{zz.one}} {{topic.entity}} {{aa.two}} {{#if mm.guard}}x{{/if}}";
        let err = parse_template(source, None).unwrap_err();
        match err {
            TemplateError::UnknownVariables { names } => {
                assert_eq!(names, vec!["aa.two", "mm.guard", "zz.one"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_validates_untaken_branches() {
        let source = "{{#if research.depth == \"deep\"}}{{typo.inBranch}}{{/if}}";
        let err = parse_template(source, None).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownVariables { .. }));
    }

    #[test]
    fn test_parse_rejects_invalid_enum_literal() {
        let source = "{{#if standards.tone == \"acadmic\"}}x{{/if}}";
        let err = parse_template(source, None).unwrap_err();
        match err {
            TemplateError::InvalidLiterals { literals } => {
                assert_eq!(literals.len(), 1);
                assert_eq!(literals[0].literal, "acadmic");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_conditionals() {
        let err = parse_template("{{/if}}", None).unwrap_err();
        assert!(matches!(err, TemplateError::Conditional { .. }));
    }

    #[test]
    fn test_parse_rejects_placeholder_formed_by_removed_block() {
        let err = parse_template("{{{{#if topic.claim}}{{/if}}bogus.var}}", None).unwrap_err();
        match err {
            TemplateError::UnknownVariables { names } => assert_eq!(names, vec!["bogus.var"]),
            other => panic!("expected UnknownVariables, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_placeholder_formed_by_kept_block() {
        let err = parse_template("{{#if topic.claim}}{{{/if}}{bogus.var}}", None).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownVariables { names } if names == ["bogus.var"]));
    }

    #[test]
    fn test_parse_accepts_valid_name_formed_by_splice() {
        let template = parse_template("{{{{#if topic.claim}}{{/if}}topic.entity}}", None).unwrap();
        assert!(template.variables().is_empty());
    }

    #[test]
    fn test_guard_variables() {
        let template = parse_template(
            "{{#if standards.disclaimer}}{{standards.disclaimer}}{{/if}}{{#if research.depth != \"quick\"}}x{{/if}}",
            None,
        )
        .unwrap();
        let guards: Vec<&str> = template.guard_variables().into_iter().collect();
        assert_eq!(guards, vec!["research.depth", "standards.disclaimer"]);
    }

    #[test]
    fn test_version_depends_only_on_source() {
        let a = parse_template("Hello {{topic.entity}}", Some("a")).unwrap();
        let b = parse_template("Hello {{topic.entity}}", Some("b")).unwrap();
        let c = parse_template("Hi {{topic.entity}}", Some("a")).unwrap();

        assert_eq!(a.version(), b.version());
        assert_ne!(a.version(), c.version());
        assert_eq!(a.version().len(), 12);
    }
}
