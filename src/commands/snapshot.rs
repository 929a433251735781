//! Implementation of the `promptvault snapshot` commands.

use crate::cli::{SnapshotListArgs, SnapshotRefArgs};
use crate::context::ProjectContext;
use crate::error::{PromptError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::snapshot::{
    AuditReport, PromptSnapshot, SnapshotIssue, SnapshotVerification, audit_snapshots,
    list_snapshots, load_snapshot_by_hash, verify_snapshot,
};
use chrono::SecondsFormat;
use serde_json::json;

/// List stored hashes for a template and topic.
pub fn cmd_snapshot_list(ctx: &ProjectContext, args: SnapshotListArgs) -> Result<()> {
    let hashes = list_snapshots(&args.template, &args.topic, ctx.snapshots_dir())?;

    if hashes.is_empty() {
        println!(
            "No snapshots for template '{}' topic '{}'.",
            args.template, args.topic
        );
        return Ok(());
    }

    for hash in hashes {
        println!("{}", hash);
    }
    Ok(())
}

/// Print a stored snapshot's metadata and text.
pub fn cmd_snapshot_show(ctx: &ProjectContext, args: SnapshotRefArgs) -> Result<()> {
    let snapshot = load(ctx, &args)?;
    let meta = snapshot.metadata();

    println!("Hash:       {}", snapshot.hash());
    println!("Template:   {} (version {})", meta.template_name, meta.template_version);
    println!("Topic:      {}", meta.topic_id);
    println!("Git:        {} ({})", meta.git_commit, meta.git_branch);
    println!(
        "Created:    {}",
        meta.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    println!();
    println!("--------------------------------------------------------------------------------");
    print!("{}", snapshot.rendered_text());
    if !snapshot.rendered_text().ends_with('\n') {
        println!();
    }
    println!("--------------------------------------------------------------------------------");

    Ok(())
}

/// Recompute a stored snapshot's hash. A mismatch is an integrity failure.
pub fn cmd_snapshot_verify(ctx: &ProjectContext, args: SnapshotRefArgs) -> Result<()> {
    let verification = verify(ctx, &args)?;

    if verification.valid {
        println!("OK {}", verification.stored_hash);
        Ok(())
    } else {
        println!(
            "MISMATCH stored {} computed {}",
            verification.stored_hash, verification.computed_hash
        );
        Err(PromptError::IntegrityError(format!(
            "snapshot {} for template '{}' topic '{}' does not match its text",
            args.hash, args.template, args.topic
        )))
    }
}

pub fn verify(ctx: &ProjectContext, args: &SnapshotRefArgs) -> Result<SnapshotVerification> {
    let snapshot = load(ctx, args)?;
    let verification = verify_snapshot(&snapshot);

    let event = Event::new(EventAction::Verify)
        .with_topic(&args.topic)
        .with_details(json!({
            "hash": args.hash,
            "template": args.template,
            "valid": verification.valid,
            "computed_hash": verification.computed_hash,
        }));
    append_event(ctx, &event)?;

    Ok(verification)
}

/// Sweep the whole store. Any finding is an integrity failure.
pub fn cmd_snapshot_audit(ctx: &ProjectContext) -> Result<()> {
    let report = audit(ctx)?;

    for problem in &report.problems {
        println!("{}: {}", problem.path.display(), problem.finding);
    }
    println!(
        "{} snapshot(s) checked, {} problem(s).",
        report.checked,
        report.problems.len()
    );

    if report.is_clean() {
        Ok(())
    } else {
        Err(PromptError::IntegrityError(format!(
            "{} problem(s) found in {}",
            report.problems.len(),
            ctx.snapshots_dir().display()
        )))
    }
}

pub fn audit(ctx: &ProjectContext) -> Result<AuditReport> {
    let report = audit_snapshots(ctx.snapshots_dir())?;

    let event = Event::new(EventAction::Audit).with_details(json!(report.summary()));
    append_event(ctx, &event)?;

    Ok(report)
}

fn load(ctx: &ProjectContext, args: &SnapshotRefArgs) -> Result<PromptSnapshot> {
    load_snapshot_by_hash(&args.hash, &args.template, &args.topic, ctx.snapshots_dir())
        .map_err(issue_to_error)
}

/// A missing or mis-addressed snapshot is the caller's mistake; a file that
/// exists but cannot be read back is damage to the store.
fn issue_to_error(issue: SnapshotIssue) -> PromptError {
    match issue {
        SnapshotIssue::NotFound { .. } | SnapshotIssue::InvalidCoordinate(_) => {
            PromptError::UserError(issue.to_string())
        }
        SnapshotIssue::Unreadable { .. } | SnapshotIssue::Invalid { .. } => {
            PromptError::IntegrityError(issue.to_string())
        }
    }
}
