//! Git command runner and provenance capture.
//!
//! Snapshots record the commit and branch they were rendered at. Git is
//! optional: outside a repository, or without a `git` binary, provenance is
//! `unknown` and rendering carries on.

use crate::error::{PromptError, Result};
use crate::snapshot::UNKNOWN;
use std::path::Path;
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Run a git command with the specified working directory.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(PromptError::UserError)` - If git cannot be started or exits non-zero
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            PromptError::UserError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(PromptError::UserError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Commit and branch at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitState {
    pub commit: String,
    pub branch: String,
}

impl GitState {
    /// Capture the state of the repository containing `dir`.
    ///
    /// Never fails: anything git cannot answer is `unknown`. A detached HEAD
    /// has no branch and reports `unknown`.
    pub fn capture<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();

        let commit = query(dir, &["rev-parse", "HEAD"]);
        let branch = query(dir, &["rev-parse", "--abbrev-ref", "HEAD"])
            .filter(|name| name != "HEAD");

        Self {
            commit: commit.unwrap_or_else(|| UNKNOWN.to_string()),
            branch: branch.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }

    pub fn unknown() -> Self {
        Self {
            commit: UNKNOWN.to_string(),
            branch: UNKNOWN.to_string(),
        }
    }
}

fn query(dir: &Path, args: &[&str]) -> Option<String> {
    match run_git(dir, args) {
        Ok(output) if !output.stdout.is_empty() && !output.stdout.contains('\n') => {
            Some(output.stdout)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "git provenance unavailable");
            None
        }
    }
}
