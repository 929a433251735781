//! CLI argument parsing for promptvault.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Promptvault: render research prompts from templates and keep
/// content-addressed snapshots of exactly what was sent.
///
/// Templates live in a directory of `.md`/`.txt` files using
/// `{{variable.path}}` placeholders and `{{#if}}` blocks. Every render can be
/// stored as an immutable snapshot identified by the hash of its text.
#[derive(Parser, Debug)]
#[command(name = "promptvault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for promptvault.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the template variable registry.
    ///
    /// Prints every legal variable with its kind.
    Vars(VarsArgs),

    /// Template directory commands.
    ///
    /// List template files or check that every template parses.
    Templates(TemplatesCommand),

    /// Render a template with a context file.
    ///
    /// Prints the prompt to stdout and, unless `--no-store` is given,
    /// stores a snapshot and prints its path to stderr.
    Render(RenderArgs),

    /// Snapshot store commands.
    ///
    /// List, show, verify or audit stored snapshots.
    Snapshot(SnapshotCommand),
}

/// Arguments for the `vars` command.
#[derive(Parser, Debug)]
pub struct VarsArgs {
    /// Also print the allowed literals of enum variables.
    #[arg(long)]
    pub enums: bool,
}

/// Templates subcommand wrapper.
#[derive(Parser, Debug)]
pub struct TemplatesCommand {
    #[command(subcommand)]
    pub action: TemplatesAction,
}

/// Templates subcommands.
#[derive(Subcommand, Debug)]
pub enum TemplatesAction {
    /// List template files.
    List,

    /// Load and parse every template, reporting its variables.
    Check,
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Template filename (e.g. deep-research.md).
    pub template: String,

    /// YAML file with variable values.
    #[arg(short, long)]
    pub context: PathBuf,

    /// Topic the snapshot is filed under (defaults to `topic.id` from the context).
    ///
    /// A context `topic.id` used this way is not reported as unused in strict
    /// mode. With `--topic` or `--no-store` it must appear in the template.
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Allow context values the template does not use.
    #[arg(long)]
    pub lenient: bool,

    /// Print the prompt without storing a snapshot.
    #[arg(long)]
    pub no_store: bool,
}

/// Snapshot subcommand wrapper.
#[derive(Parser, Debug)]
pub struct SnapshotCommand {
    #[command(subcommand)]
    pub action: SnapshotAction,
}

/// Snapshot subcommands.
#[derive(Subcommand, Debug)]
pub enum SnapshotAction {
    /// List stored hashes for a template and topic.
    List(SnapshotListArgs),

    /// Print a stored snapshot.
    Show(SnapshotRefArgs),

    /// Recompute a stored snapshot's hash (exit code 3 on mismatch).
    Verify(SnapshotRefArgs),

    /// Verify every stored snapshot (exit code 3 on any finding).
    Audit,
}

/// Arguments for `snapshot list`.
#[derive(Parser, Debug)]
pub struct SnapshotListArgs {
    /// Template filename.
    pub template: String,

    /// Topic id.
    pub topic: String,
}

/// Arguments identifying one stored snapshot.
#[derive(Parser, Debug)]
pub struct SnapshotRefArgs {
    /// Template filename.
    pub template: String,

    /// Topic id.
    pub topic: String,

    /// Snapshot hash (12 hex characters).
    pub hash: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
