//! Error types for template loading, parsing and rendering.
//!
//! Every variant that can name more than one offender carries the complete
//! list, so a template author fixes everything in one pass.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for template failures.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template directory does not exist.
    #[error("template directory not found: '{}'", path.display())]
    DirectoryNotFound {
        /// The directory that was requested.
        path: PathBuf,
    },

    /// The template file does not exist.
    #[error("template file not found: '{}'", path.display())]
    FileNotFound {
        /// The file that was requested.
        path: PathBuf,
    },

    /// The template file does not have an accepted extension.
    #[error("unsupported template extension for '{}' (expected .md or .txt)", path.display())]
    UnsupportedExtension {
        /// The offending file.
        path: PathBuf,
    },

    /// Reading a template file or directory failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The template references names outside the variable registry.
    #[error("unknown template variables: {}", names.join(", "))]
    UnknownVariables {
        /// Every unrecognized name, sorted.
        names: Vec<String>,
    },

    /// `{{#if}}` / `{{/if}}` markers are unbalanced, nested or malformed.
    #[error("invalid conditional blocks: {}", join_display(issues))]
    Conditional {
        /// Every offending marker, in document order.
        issues: Vec<ConditionalIssue>,
    },

    /// A conditional compares an enum variable against a non-member literal.
    #[error("invalid conditional literals: {}", join_display(literals))]
    InvalidLiterals {
        /// Every offending comparison, in document order.
        literals: Vec<LiteralIssue>,
    },

    /// Context values rejected by the variable registry's kinds.
    #[error("invalid context values: {}", issues.join("; "))]
    InvalidContextValues {
        /// One message per rejected value.
        issues: Vec<String>,
    },

    /// Template placeholders without a value in the context.
    #[error("missing values for template variables: {}", names.join(", "))]
    MissingVariables {
        /// Every missing name, sorted.
        names: Vec<String>,
    },

    /// Context values that the template never consumes (strict rendering).
    #[error("context variables not used by template: {}", names.join(", "))]
    UnusedVariables {
        /// Every unused name, sorted.
        names: Vec<String>,
    },
}

impl TemplateError {
    /// Whether this error comes from locating or reading template files
    /// rather than from template content.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            TemplateError::DirectoryNotFound { .. }
                | TemplateError::FileNotFound { .. }
                | TemplateError::UnsupportedExtension { .. }
                | TemplateError::Io { .. }
        )
    }
}

/// What is wrong with a conditional marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalIssueKind {
    /// `{{/if}}` with no open block.
    UnmatchedClose,
    /// `{{#if}}` that is never closed.
    Unclosed,
    /// `{{#if}}` inside another block.
    Nested,
    /// The guard expression could not be parsed.
    InvalidExpression(String),
}

/// A single conditional marker problem with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalIssue {
    /// What went wrong.
    pub kind: ConditionalIssueKind,
    /// Byte offset of the marker in the source.
    pub position: usize,
    /// Line number of the marker (1-based).
    pub line: usize,
}

impl fmt::Display for ConditionalIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match &self.kind {
            ConditionalIssueKind::UnmatchedClose => {
                "'{{/if}}' without matching '{{#if}}'".to_string()
            }
            ConditionalIssueKind::Unclosed => "'{{#if}}' is never closed".to_string(),
            ConditionalIssueKind::Nested => "nested '{{#if}}' is not supported".to_string(),
            ConditionalIssueKind::InvalidExpression(expr) => {
                format!("invalid condition expression '{}'", expr)
            }
        };
        write!(f, "{} at line {} (offset {})", what, self.line, self.position)
    }
}

/// An enum comparison whose literal is not a member of the variable's enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralIssue {
    /// The compared variable.
    pub variable: String,
    /// The literal found in the template.
    pub literal: String,
    /// The legal members.
    pub allowed: &'static [&'static str],
    /// Byte offset of the block in the source.
    pub position: usize,
}

impl fmt::Display for LiteralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a value of {} (expected one of: {})",
            self.literal,
            self.variable,
            self.allowed.join(", ")
        )
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
