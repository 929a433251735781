//! Audit event log for promptvault.
//!
//! Every snapshot store, verification and audit sweep appends one event to
//! an NDJSON file (one JSON object per line), by default
//! `snapshots/events.ndjson`. The log is append-only and can be turned off
//! with `audit_events: false`.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `store`, `verify` or `audit`
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `topic`: optional topic id for snapshot-specific events
//! - `details`: freeform object with action-specific details

use crate::context::ProjectContext;
use crate::error::{PromptError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Snapshot written (or found already stored)
    Store,
    /// Single snapshot integrity check
    Verify,
    /// Whole-store integrity sweep
    Audit,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Store => write!(f, "store"),
            EventAction::Verify => write!(f, "verify"),
            EventAction::Audit => write!(f, "audit"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Topic the snapshot belongs to, for snapshot-specific events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            topic: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_topic(mut self, topic_id: impl Into<String>) -> Self {
        self.topic = Some(topic_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            PromptError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the project's event log.
///
/// Does nothing when audit events are disabled in the config.
pub fn append_event(ctx: &ProjectContext, event: &Event) -> Result<()> {
    match ctx.events_log() {
        Some(path) => append_event_to(&path, event),
        None => Ok(()),
    }
}

/// Append an event as one line to `events_file`, creating the file and its
/// parent directory if needed.
pub fn append_event_to(events_file: &Path, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    if let Some(dir) = events_file.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| {
            PromptError::UserError(format!(
                "failed to create events directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(events_file)
        .map_err(|e| {
            PromptError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        PromptError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        PromptError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    tracing::debug!(action = %event.action, "appended audit event");
    Ok(())
}
