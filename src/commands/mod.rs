//! Command implementations for promptvault.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command except `vars` runs inside a resolved
//! [`ProjectContext`].

mod render;
mod snapshot;
mod templates;
mod vars;

use crate::cli::{Command, SnapshotAction, TemplatesAction};
use crate::context::ProjectContext;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Vars(args) => vars::cmd_vars(args),
        Command::Templates(cmd) => {
            let ctx = ProjectContext::resolve()?;
            match cmd.action {
                TemplatesAction::List => templates::cmd_templates_list(&ctx),
                TemplatesAction::Check => templates::cmd_templates_check(&ctx),
            }
        }
        Command::Render(args) => {
            let ctx = ProjectContext::resolve()?;
            render::cmd_render(&ctx, args)
        }
        Command::Snapshot(cmd) => {
            let ctx = ProjectContext::resolve()?;
            match cmd.action {
                SnapshotAction::List(args) => snapshot::cmd_snapshot_list(&ctx, args),
                SnapshotAction::Show(args) => snapshot::cmd_snapshot_show(&ctx, args),
                SnapshotAction::Verify(args) => snapshot::cmd_snapshot_verify(&ctx, args),
                SnapshotAction::Audit => snapshot::cmd_snapshot_audit(&ctx),
            }
        }
    }
}
