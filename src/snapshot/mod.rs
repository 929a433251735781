//! Content-addressed prompt snapshots.
//!
//! A snapshot is a rendered prompt plus provenance, identified by a hash of
//! the rendered text alone. Snapshots are stored write-once under
//! `<base>/<template stem>/<topic>/<hash>.md` and can be verified at any time
//! by recomputing the hash.

mod audit;
mod format;
mod hash;
mod model;
mod store;

pub use audit::{AuditFinding, AuditProblem, AuditReport, AuditSummary, audit_snapshots};
pub use format::{FormatError, HEADER_FIELDS, SEPARATOR, parse_snapshot, serialize_snapshot};
pub use hash::{HASH_LENGTH, compute_prompt_hash, compute_template_version, is_valid_hash};
pub use model::{
    PromptSnapshot, SnapshotInput, SnapshotMetadata, SnapshotVerification, UNKNOWN,
    create_snapshot, verify_snapshot,
};
pub use store::{
    DEFAULT_SNAPSHOT_DIR, SNAPSHOT_EXTENSION, SnapshotIssue, get_snapshot_path, list_snapshots,
    load_snapshot_by_hash, load_snapshot_file, store_snapshot, template_stem,
};
