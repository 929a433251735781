//! Whole-store integrity sweep.

use super::model::verify_snapshot;
use super::store::{
    SNAPSHOT_EXTENSION, SnapshotIssue, load_snapshot_file, snapshot_hashes_in, template_stem,
};
use crate::error::{PromptError, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// What is wrong with one stored file.
#[derive(Debug)]
pub enum AuditFinding {
    /// The file could not be read or parsed.
    Unreadable(SnapshotIssue),
    /// The text no longer matches the stored hash.
    HashMismatch { stored: String, computed: String },
    /// The filename disagrees with the header hash.
    MisfiledHash {
        file_hash: String,
        header_hash: String,
    },
    /// The header template or topic disagrees with the directory it sits in.
    Misplaced { template: String, topic: String },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFinding::Unreadable(issue) => write!(f, "{}", issue),
            AuditFinding::HashMismatch { stored, computed } => {
                write!(f, "hash mismatch: stored {}, computed {}", stored, computed)
            }
            AuditFinding::MisfiledHash {
                file_hash,
                header_hash,
            } => write!(
                f,
                "filename hash {} does not match header hash {}",
                file_hash, header_hash
            ),
            AuditFinding::Misplaced { template, topic } => write!(
                f,
                "header says template '{}' topic '{}', which does not match its directory",
                template, topic
            ),
        }
    }
}

/// A finding tied to the file it was found in.
#[derive(Debug)]
pub struct AuditProblem {
    pub path: PathBuf,
    pub finding: AuditFinding,
}

/// Result of [`audit_snapshots`].
#[derive(Debug, Default)]
pub struct AuditReport {
    /// Number of snapshot files examined.
    pub checked: usize,
    pub problems: Vec<AuditProblem>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Counts for the event log.
    pub fn summary(&self) -> AuditSummary {
        AuditSummary {
            checked: self.checked,
            problems: self.problems.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub checked: usize,
    pub problems: usize,
}

/// Load and verify every `<template>/<topic>/<hash>.md` under `base_dir`.
///
/// Per-file problems are collected, never returned as errors; only a
/// directory that cannot be listed aborts the sweep. A missing base
/// directory is an empty, clean store.
pub fn audit_snapshots(base_dir: impl AsRef<Path>) -> Result<AuditReport> {
    let base_dir = base_dir.as_ref();
    let mut report = AuditReport::default();

    for template_dir in subdirectories(base_dir)? {
        for topic_dir in subdirectories(&template_dir)? {
            for file_hash in snapshot_hashes_in(&topic_dir)? {
                let path = topic_dir.join(format!("{}.{}", file_hash, SNAPSHOT_EXTENSION));
                report.checked += 1;

                for finding in audit_file(&path, &file_hash, &template_dir, &topic_dir) {
                    tracing::warn!(path = %path.display(), "{}", finding);
                    report.problems.push(AuditProblem {
                        path: path.clone(),
                        finding,
                    });
                }
            }
        }
    }

    tracing::debug!(
        checked = report.checked,
        problems = report.problems.len(),
        "snapshot audit finished"
    );
    Ok(report)
}

fn audit_file(
    path: &Path,
    file_hash: &str,
    template_dir: &Path,
    topic_dir: &Path,
) -> Vec<AuditFinding> {
    let snapshot = match load_snapshot_file(path) {
        Ok(snapshot) => snapshot,
        Err(issue) => return vec![AuditFinding::Unreadable(issue)],
    };

    let mut findings = Vec::new();

    let verification = verify_snapshot(&snapshot);
    if !verification.valid {
        findings.push(AuditFinding::HashMismatch {
            stored: verification.stored_hash,
            computed: verification.computed_hash,
        });
    }

    if snapshot.hash() != file_hash {
        findings.push(AuditFinding::MisfiledHash {
            file_hash: file_hash.to_string(),
            header_hash: snapshot.hash().to_string(),
        });
    }

    let meta = snapshot.metadata();
    let dir_name = |p: &Path| p.file_name().and_then(|n| n.to_str()).map(str::to_string);
    if dir_name(template_dir).as_deref() != Some(template_stem(&meta.template_name))
        || dir_name(topic_dir).as_deref() != Some(meta.topic_id.as_str())
    {
        findings.push(AuditFinding::Misplaced {
            template: meta.template_name.clone(),
            topic: meta.topic_id.clone(),
        });
    }

    findings
}

/// Non-hidden subdirectories, sorted. Missing directory yields none.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let read_err = |e: std::io::Error| {
        PromptError::UserError(format!("failed to read directory '{}': {}", dir.display(), e))
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_none_or(|n| n.starts_with('.'));
        if path.is_dir() && !hidden {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
