//! Error types for promptvault.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Template and render failures keep their structured form in
//! [`TemplateError`]; everything else is reported as a message.

use crate::exit_codes;
use crate::template::TemplateError;
use thiserror::Error;

/// Main error type for promptvault operations.
///
/// Each variant maps to a specific exit code (see [`exit_codes`]).
#[derive(Error, Debug)]
pub enum PromptError {
    /// User provided invalid arguments or the environment is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// Template loading, parsing or rendering failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A snapshot record failed integrity checks or could not be read.
    #[error("Snapshot integrity check failed: {0}")]
    IntegrityError(String),
}

impl PromptError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PromptError::UserError(_) => exit_codes::USER_ERROR,
            PromptError::Template(err) if err.is_load_error() => exit_codes::USER_ERROR,
            PromptError::Template(_) => exit_codes::TEMPLATE_FAILURE,
            PromptError::IntegrityError(_) => exit_codes::INTEGRITY_FAILURE,
        }
    }
}

/// Result type alias for promptvault operations.
pub type Result<T> = std::result::Result<T, PromptError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = PromptError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn render_errors_map_to_template_failure() {
        let err = PromptError::from(TemplateError::MissingVariables {
            names: vec!["topic.entity".to_string()],
        });
        assert_eq!(err.exit_code(), exit_codes::TEMPLATE_FAILURE);
    }

    #[test]
    fn load_errors_map_to_user_error() {
        let err = PromptError::from(TemplateError::DirectoryNotFound {
            path: PathBuf::from("templates"),
        });
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn integrity_error_has_correct_exit_code() {
        let err = PromptError::IntegrityError("hash mismatch".to_string());
        assert_eq!(err.exit_code(), exit_codes::INTEGRITY_FAILURE);
        assert_eq!(
            err.to_string(),
            "Snapshot integrity check failed: hash mismatch"
        );
    }

    #[test]
    fn template_errors_display_transparently() {
        let err = PromptError::from(TemplateError::UnknownVariables {
            names: vec!["bogus.var".to_string()],
        });
        assert_eq!(err.to_string(), "unknown template variables: bogus.var");
    }
}
