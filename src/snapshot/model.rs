//! Snapshot records and their integrity check.

use super::hash::compute_prompt_hash;
use chrono::{DateTime, SubsecRound, Utc};

/// Placeholder for provenance that could not be determined.
pub const UNKNOWN: &str = "unknown";

/// Provenance recorded alongside a rendered prompt.
///
/// None of these fields take part in the snapshot hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMetadata {
    /// Template filename the prompt was rendered from (e.g. `deep-research.md`).
    pub template_name: String,
    /// Fingerprint of the raw template source.
    pub template_version: String,
    /// Topic the prompt was rendered for.
    pub topic_id: String,
    /// Git commit at render time, or `unknown`.
    pub git_commit: String,
    /// Git branch at render time, or `unknown`.
    pub git_branch: String,
    /// Creation time, millisecond precision.
    pub created_at: DateTime<Utc>,
}

/// An immutable rendered prompt with its content hash.
///
/// Fields are read-only; a changed prompt is a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSnapshot {
    hash: String,
    rendered_text: String,
    metadata: SnapshotMetadata,
}

impl PromptSnapshot {
    /// Reassemble a snapshot read back from storage.
    ///
    /// The hash is taken as stored; use [`verify_snapshot`] to check it.
    pub(crate) fn from_parts(
        hash: String,
        rendered_text: String,
        metadata: SnapshotMetadata,
    ) -> Self {
        Self {
            hash,
            rendered_text,
            metadata,
        }
    }

    /// The content hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The rendered prompt text.
    pub fn rendered_text(&self) -> &str {
        &self.rendered_text
    }

    /// Provenance metadata.
    pub fn metadata(&self) -> &SnapshotMetadata {
        &self.metadata
    }
}

/// Inputs for [`create_snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotInput {
    pub rendered_text: String,
    pub template_name: String,
    pub template_version: String,
    pub topic_id: String,
    /// Defaults to `unknown`.
    pub git_commit: Option<String>,
    /// Defaults to `unknown`.
    pub git_branch: Option<String>,
    /// Defaults to now.
    pub created_at: Option<DateTime<Utc>>,
}

/// Build a snapshot, hashing the rendered text only.
///
/// Timestamps are truncated to milliseconds, the precision of the on-disk
/// format.
pub fn create_snapshot(input: SnapshotInput) -> PromptSnapshot {
    let hash = compute_prompt_hash(&input.rendered_text);
    let created_at = input.created_at.unwrap_or_else(Utc::now).trunc_subsecs(3);

    PromptSnapshot {
        hash,
        rendered_text: input.rendered_text,
        metadata: SnapshotMetadata {
            template_name: input.template_name,
            template_version: input.template_version,
            topic_id: input.topic_id,
            git_commit: input.git_commit.unwrap_or_else(|| UNKNOWN.to_string()),
            git_branch: input.git_branch.unwrap_or_else(|| UNKNOWN.to_string()),
            created_at,
        },
    }
}

/// Outcome of [`verify_snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotVerification {
    /// Whether the stored hash matches the text.
    pub valid: bool,
    /// The hash recorded in the snapshot.
    pub stored_hash: String,
    /// The hash recomputed from the text.
    pub computed_hash: String,
}

/// Recompute a snapshot's hash from its text and compare.
pub fn verify_snapshot(snapshot: &PromptSnapshot) -> SnapshotVerification {
    let computed_hash = compute_prompt_hash(&snapshot.rendered_text);
    SnapshotVerification {
        valid: computed_hash == snapshot.hash,
        stored_hash: snapshot.hash.clone(),
        computed_hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn input(text: &str) -> SnapshotInput {
        SnapshotInput {
            rendered_text: text.to_string(),
            template_name: "deep-research.md".to_string(),
            template_version: "0123456789ab".to_string(),
            topic_id: "dairy_harms_acne".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_snapshot_hashes_text() {
        let snapshot = create_snapshot(input("abc"));
        assert_eq!(snapshot.hash(), "ba7816bf8f01");
        assert_eq!(snapshot.rendered_text(), "abc");
        assert_eq!(snapshot.metadata().topic_id, "dairy_harms_acne");
    }

    #[test]
    fn test_create_snapshot_defaults() {
        let before = Utc::now().trunc_subsecs(3);
        let snapshot = create_snapshot(input("abc"));
        let after = Utc::now();

        assert_eq!(snapshot.metadata().git_commit, UNKNOWN);
        assert_eq!(snapshot.metadata().git_branch, UNKNOWN);
        assert!(snapshot.metadata().created_at >= before);
        assert!(snapshot.metadata().created_at <= after);
    }

    #[test]
    fn test_created_at_truncated_to_millis() {
        let precise = Utc
            .with_ymd_and_hms(2026, 1, 13, 10, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789);
        let snapshot = create_snapshot(SnapshotInput {
            created_at: precise,
            ..input("abc")
        });
        assert_eq!(
            snapshot.metadata().created_at.timestamp_subsec_nanos(),
            123_000_000
        );
    }

    #[test]
    fn test_metadata_independence() {
        let a = create_snapshot(SnapshotInput {
            git_commit: Some("abc1234".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            ..input("same prompt")
        });
        let b = create_snapshot(SnapshotInput {
            git_commit: Some("def5678".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()),
            ..input("same prompt")
        });

        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.metadata(), b.metadata());
    }

    #[test]
    fn test_verify_valid_snapshot() {
        let snapshot = create_snapshot(input("some prompt"));
        let result = verify_snapshot(&snapshot);
        assert!(result.valid);
        assert_eq!(result.stored_hash, result.computed_hash);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let original = create_snapshot(input("original"));
        let tampered = PromptSnapshot::from_parts(
            original.hash().to_string(),
            "tampered".to_string(),
            original.metadata().clone(),
        );

        let result = verify_snapshot(&tampered);
        assert!(!result.valid);
        assert_eq!(result.stored_hash, original.hash());
        assert_ne!(result.stored_hash, result.computed_hash);
    }
}
