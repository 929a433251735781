//! Content-addressed snapshot storage.
//!
//! Layout: `<base>/<template stem>/<topic>/<hash>.md`. Files are written once
//! and never modified; storing the same prompt twice is a no-op.

use super::format::{FormatError, parse_snapshot, serialize_snapshot};
use super::hash::is_valid_hash;
use super::model::PromptSnapshot;
use crate::error::{PromptError, Result};
use crate::fs::atomic_write_file;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default snapshot base directory, relative to the project root.
pub const DEFAULT_SNAPSHOT_DIR: &str = "snapshots/prompts";

/// File extension of stored snapshots.
pub const SNAPSHOT_EXTENSION: &str = "md";

/// Why a stored snapshot could not be produced.
#[derive(Debug, Error)]
pub enum SnapshotIssue {
    #[error("snapshot not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read snapshot '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid snapshot '{}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("invalid snapshot coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Template filename without its extension (`deep-research.md` -> `deep-research`).
pub fn template_stem(template_name: &str) -> &str {
    match template_name.rfind('.') {
        Some(idx) if idx > 0 => &template_name[..idx],
        _ => template_name,
    }
}

/// Compute where a snapshot lives. Pure; touches nothing on disk.
pub fn get_snapshot_path(
    template_name: &str,
    topic_id: &str,
    hash: &str,
    base_dir: impl AsRef<Path>,
) -> PathBuf {
    base_dir
        .as_ref()
        .join(template_stem(template_name))
        .join(topic_id)
        .join(format!("{}.{}", hash, SNAPSHOT_EXTENSION))
}

/// Reject a path component that would escape or break the layout.
fn check_component(label: &str, value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} is empty", label));
    }
    if value == "." || value == ".." {
        return Err(format!("{} '{}' is not a valid directory name", label, value));
    }
    if value.contains(['/', '\\', '\n', '\r']) {
        return Err(format!(
            "{} '{}' contains a path separator or line break",
            label,
            value.escape_default()
        ));
    }
    Ok(())
}

fn check_coordinates(
    template_name: &str,
    topic_id: &str,
    hash: &str,
) -> std::result::Result<(), String> {
    check_component("template name", template_stem(template_name))?;
    check_component("topic id", topic_id)?;
    if !is_valid_hash(hash) {
        return Err(format!("'{}' is not a 12-character hex hash", hash));
    }
    Ok(())
}

/// Persist a snapshot. Write-once: an existing file is left untouched and its
/// path returned.
pub fn store_snapshot(snapshot: &PromptSnapshot, base_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let meta = snapshot.metadata();
    check_coordinates(&meta.template_name, &meta.topic_id, snapshot.hash())
        .map_err(|msg| PromptError::UserError(format!("cannot store snapshot: {}", msg)))?;

    // Header values are single lines in the on-disk format.
    for (field, value) in [
        ("templateName", &meta.template_name),
        ("templateVersion", &meta.template_version),
        ("gitCommit", &meta.git_commit),
        ("gitBranch", &meta.git_branch),
    ] {
        if value.contains(['\n', '\r']) {
            return Err(PromptError::UserError(format!(
                "cannot store snapshot: {} contains a line break",
                field
            )));
        }
    }

    let path = get_snapshot_path(
        &meta.template_name,
        &meta.topic_id,
        snapshot.hash(),
        base_dir,
    );

    if path.exists() {
        tracing::debug!(path = %path.display(), "snapshot already stored");
        return Ok(path);
    }

    atomic_write_file(&path, &serialize_snapshot(snapshot))?;
    tracing::info!(
        hash = snapshot.hash(),
        template = %meta.template_name,
        topic = %meta.topic_id,
        "stored snapshot"
    );

    Ok(path)
}

/// Load a snapshot by its coordinates.
pub fn load_snapshot_by_hash(
    hash: &str,
    template_name: &str,
    topic_id: &str,
    base_dir: impl AsRef<Path>,
) -> std::result::Result<PromptSnapshot, SnapshotIssue> {
    check_coordinates(template_name, topic_id, hash).map_err(SnapshotIssue::InvalidCoordinate)?;
    load_snapshot_file(get_snapshot_path(template_name, topic_id, hash, base_dir))
}

/// Load and parse a single snapshot file.
pub fn load_snapshot_file(
    path: impl AsRef<Path>,
) -> std::result::Result<PromptSnapshot, SnapshotIssue> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SnapshotIssue::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(SnapshotIssue::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    parse_snapshot(&content).map_err(|source| SnapshotIssue::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Hashes stored for a template and topic, sorted. A missing directory
/// yields an empty list.
pub fn list_snapshots(
    template_name: &str,
    topic_id: &str,
    base_dir: impl AsRef<Path>,
) -> Result<Vec<String>> {
    check_component("template name", template_stem(template_name))
        .and_then(|_| check_component("topic id", topic_id))
        .map_err(PromptError::UserError)?;

    let dir = base_dir
        .as_ref()
        .join(template_stem(template_name))
        .join(topic_id);
    snapshot_hashes_in(&dir)
}

/// `.md` file stems in `dir`, dotfiles skipped, sorted.
pub(super) fn snapshot_hashes_in(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        PromptError::UserError(format!(
            "failed to read snapshot directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut hashes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            PromptError::UserError(format!(
                "failed to read snapshot directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            hashes.push(stem.to_string());
        }
    }

    hashes.sort();
    Ok(hashes)
}
