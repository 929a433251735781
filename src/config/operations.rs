//! Config loading and validation.

use super::model::Config;
use crate::error::{PromptError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PromptError::UserError)` - Read or parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PromptError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PromptError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// Every path field must be non-empty.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("templates_dir", &self.templates_dir),
            ("snapshots_dir", &self.snapshots_dir),
            ("events_log", &self.events_log),
        ] {
            if value.trim().is_empty() {
                return Err(PromptError::UserError(format!(
                    "config validation failed: {} must not be empty",
                    field
                )));
            }
        }

        Ok(())
    }
}
