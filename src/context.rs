//! Project context resolution for promptvault.
//!
//! Finds the project root by walking up from the working directory until a
//! `promptvault.yaml` is found, loads the config, and resolves the template,
//! snapshot and event log locations against that root. Without a config file
//! the working directory is the root and defaults apply.
//!
//! All commands use this module so that they behave the same from any
//! subdirectory of a project.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{PromptError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Resolved paths for a promptvault project.
///
/// All paths are absolute when resolved from an absolute working directory.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Directory containing `promptvault.yaml`, or the working directory.
    pub project_root: PathBuf,

    /// The config file, if one was found.
    pub config_path: Option<PathBuf>,

    /// Loaded config (defaults when no file exists).
    pub config: Config,
}

impl ProjectContext {
    /// Resolve the project context from the current working directory.
    ///
    /// # Returns
    ///
    /// * `Ok(ProjectContext)` - Successfully resolved context
    /// * `Err(PromptError::UserError)` - Working directory unavailable or config invalid
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            PromptError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the project context from a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P) -> Result<Self> {
        let cwd = cwd.as_ref();

        match find_config_file(cwd) {
            Some(config_path) => {
                let config = Config::load(&config_path)?;
                let project_root = config_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.to_path_buf());
                tracing::debug!(config = %config_path.display(), "loaded project config");
                Ok(Self {
                    project_root,
                    config_path: Some(config_path),
                    config,
                })
            }
            None => Ok(Self {
                project_root: cwd.to_path_buf(),
                config_path: None,
                config: Config::default(),
            }),
        }
    }

    /// Template directory.
    pub fn templates_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.templates_dir)
    }

    /// Snapshot store base directory.
    pub fn snapshots_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.snapshots_dir)
    }

    /// Event log file, or `None` when audit events are disabled.
    pub fn events_log(&self) -> Option<PathBuf> {
        self.config
            .audit_events
            .then(|| self.project_root.join(&self.config.events_log))
    }

    /// Resolve a user-supplied path relative to the working directory.
    pub fn resolve_input(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let cwd = env::current_dir().map_err(|e| {
            PromptError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Ok(cwd.join(path))
    }
}

/// Walk up from `start` looking for the config file.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
