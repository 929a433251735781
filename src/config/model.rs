//! Config struct definition and default implementation.

use crate::snapshot::DEFAULT_SNAPSHOT_DIR;
use serde::Deserialize;

/// Name of the project config file.
pub const CONFIG_FILE_NAME: &str = "promptvault.yaml";

/// Configuration for a promptvault project.
///
/// This struct represents the contents of `promptvault.yaml`. Relative paths
/// are resolved against the directory containing the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Locations
    // =========================================================================
    /// Directory holding `.md`/`.txt` templates.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Base directory of the snapshot store.
    #[serde(default = "default_snapshots_dir")]
    pub snapshots_dir: String,

    // =========================================================================
    // Rendering
    // =========================================================================
    /// Reject context values the template never uses.
    #[serde(default = "default_true")]
    pub strict: bool,

    // =========================================================================
    // Audit log
    // =========================================================================
    /// Append store/verify/audit events to `events_log`.
    #[serde(default = "default_true")]
    pub audit_events: bool,

    /// NDJSON event log path.
    #[serde(default = "default_events_log")]
    pub events_log: String,
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_snapshots_dir() -> String {
    DEFAULT_SNAPSHOT_DIR.to_string()
}

fn default_events_log() -> String {
    "snapshots/events.ndjson".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            snapshots_dir: default_snapshots_dir(),
            strict: default_true(),
            audit_events: default_true(),
            events_log: default_events_log(),
        }
    }
}
