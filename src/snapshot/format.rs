//! On-disk snapshot format.
//!
//! A snapshot file is seven `key: value` header lines in fixed order,
//! a `---` line, then the rendered text verbatim:
//!
//! ```text
//! hash: a1b2c3d4e5f6
//! templateName: deep-research.md
//! templateVersion: 0f1e2d3c4b5a
//! topicId: dairy_harms_acne
//! gitCommit: 9c1f0e2
//! gitBranch: main
//! createdAt: 2026-01-13T10:00:00.000Z
//! ---
//! Rendered prompt text...
//! ```
//!
//! Header lines may end in CRLF. The body is never transformed.

use super::model::{PromptSnapshot, SnapshotMetadata};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Header keys, in on-disk order.
pub const HEADER_FIELDS: [&str; 7] = [
    "hash",
    "templateName",
    "templateVersion",
    "topicId",
    "gitCommit",
    "gitBranch",
    "createdAt",
];

/// Line separating the header from the rendered text.
pub const SEPARATOR: &str = "---";

/// Why snapshot content could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The header block is structurally broken.
    #[error("malformed metadata block: {0}")]
    Malformed(String),

    /// A required header field is absent.
    #[error("missing required metadata field '{0}'")]
    MissingField(&'static str),
}

/// Serialize a snapshot to its on-disk form.
pub fn serialize_snapshot(snapshot: &PromptSnapshot) -> String {
    let meta = snapshot.metadata();
    let created_at = meta.created_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let values = [
        snapshot.hash(),
        meta.template_name.as_str(),
        meta.template_version.as_str(),
        meta.topic_id.as_str(),
        meta.git_commit.as_str(),
        meta.git_branch.as_str(),
        created_at.as_str(),
    ];

    let mut output = String::with_capacity(snapshot.rendered_text().len() + 256);
    for (key, value) in HEADER_FIELDS.iter().zip(values) {
        output.push_str(key);
        output.push_str(": ");
        output.push_str(value);
        output.push('\n');
    }
    output.push_str(SEPARATOR);
    output.push('\n');
    output.push_str(snapshot.rendered_text());

    output
}

/// Parse a snapshot from its on-disk form.
///
/// Unknown header keys are ignored. The stored hash is not checked here.
pub fn parse_snapshot(content: &str) -> Result<PromptSnapshot, FormatError> {
    let mut header: HashMap<&str, &str> = HashMap::new();
    let mut rest = content;

    let body = loop {
        let (line, after) = match rest.split_once('\n') {
            Some(split) => split,
            None if !rest.is_empty() => (rest, ""),
            None => {
                return Err(FormatError::Malformed(format!(
                    "missing '{}' separator line",
                    SEPARATOR
                )));
            }
        };
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line == SEPARATOR {
            break after;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| {
            FormatError::Malformed(format!("expected 'key: value', found '{}'", line))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(FormatError::Malformed(format!(
                "empty key in header line '{}'",
                line
            )));
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        if header.insert(key, value).is_some() {
            return Err(FormatError::Malformed(format!(
                "duplicate header field '{}'",
                key
            )));
        }

        rest = after;
    };

    let field = |name: &'static str| -> Result<String, FormatError> {
        header
            .get(name)
            .map(|v| v.to_string())
            .ok_or(FormatError::MissingField(name))
    };

    let hash = field("hash")?;
    let template_name = field("templateName")?;
    let template_version = field("templateVersion")?;
    let topic_id = field("topicId")?;
    let git_commit = field("gitCommit")?;
    let git_branch = field("gitBranch")?;
    let created_at_raw = field("createdAt")?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            FormatError::Malformed(format!("invalid createdAt '{}': {}", created_at_raw, e))
        })?;

    Ok(PromptSnapshot::from_parts(
        hash,
        body.to_string(),
        SnapshotMetadata {
            template_name,
            template_version,
            topic_id,
            git_commit,
            git_branch,
            created_at,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotInput, create_snapshot};
    use chrono::TimeZone;

    fn sample(text: &str) -> PromptSnapshot {
        create_snapshot(SnapshotInput {
            rendered_text: text.to_string(),
            template_name: "deep-research.md".to_string(),
            template_version: "0f1e2d3c4b5a".to_string(),
            topic_id: "dairy_harms_acne".to_string(),
            git_commit: Some("9c1f0e2".to_string()),
            git_branch: Some("main".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2026, 1, 13, 10, 0, 0).unwrap()),
        })
    }

    #[test]
    fn test_serialize_exact_layout() {
        let snapshot = sample("Line one\nLine two\n");
        let expected = format!(
            "hash: {}\n\
             templateName: deep-research.md\n\
             templateVersion: 0f1e2d3c4b5a\n\
             topicId: dairy_harms_acne\n\
             gitCommit: 9c1f0e2\n\
             gitBranch: main\n\
             createdAt: 2026-01-13T10:00:00.000Z\n\
             ---\n\
             Line one\nLine two\n",
            snapshot.hash()
        );
        assert_eq!(serialize_snapshot(&snapshot), expected);
    }

    #[test]
    fn test_parse_reproduces_snapshot() {
        let snapshot = sample("# Brief\n\n---\nA body with its own separator.\n\n");
        let parsed = parse_snapshot(&serialize_snapshot(&snapshot)).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_parse_empty_body() {
        let snapshot = sample("");
        let parsed = parse_snapshot(&serialize_snapshot(&snapshot)).unwrap();
        assert_eq!(parsed.rendered_text(), "");
    }

    #[test]
    fn test_parse_separator_without_trailing_newline() {
        let content = "hash: a\ntemplateName: t\ntemplateVersion: v\ntopicId: x\n\
                       gitCommit: c\ngitBranch: b\ncreatedAt: 2026-01-13T10:00:00.000Z\n---";
        let parsed = parse_snapshot(content).unwrap();
        assert_eq!(parsed.rendered_text(), "");
    }

    #[test]
    fn test_parse_crlf_header() {
        let content = "hash: a\r\ntemplateName: t\r\ntemplateVersion: v\r\ntopicId: x\r\n\
                       gitCommit: c\r\ngitBranch: b\r\ncreatedAt: 2026-01-13T10:00:00.000Z\r\n---\r\nbody\r\n";
        let parsed = parse_snapshot(content).unwrap();
        assert_eq!(parsed.hash(), "a");
        assert_eq!(parsed.metadata().git_branch, "b");
        assert_eq!(parsed.rendered_text(), "body\r\n");
    }

    #[test]
    fn test_parse_missing_separator() {
        let err = parse_snapshot("hash: a\ntemplateName: t\n").unwrap_err();
        assert!(matches!(err, FormatError::Malformed(_)));
        assert!(err.to_string().contains("separator"));
    }

    #[test]
    fn test_parse_missing_field() {
        let content = "hash: a\ntemplateName: t\ntemplateVersion: v\ntopicId: x\n\
                       gitCommit: c\ncreatedAt: 2026-01-13T10:00:00.000Z\n---\nbody";
        let err = parse_snapshot(content).unwrap_err();
        assert_eq!(err, FormatError::MissingField("gitBranch"));
    }

    #[test]
    fn test_parse_malformed_line() {
        let err = parse_snapshot("not a header line\n---\nbody").unwrap_err();
        assert!(matches!(err, FormatError::Malformed(_)));
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        let content = "hash: a\ntemplateName: t\ntemplateVersion: v\ntopicId: x\n\
                       gitCommit: c\ngitBranch: b\ncreatedAt: yesterday\n---\nbody";
        let err = parse_snapshot(content).unwrap_err();
        assert!(err.to_string().contains("createdAt"));
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let content = "hash: a\ntemplateName: t\ntemplateVersion: v\ntopicId: x\n\
                       gitCommit: c\ngitBranch: b\ncreatedAt: 2026-01-13T10:00:00.000Z\n\
                       reviewer: someone\n---\nbody";
        let parsed = parse_snapshot(content).unwrap();
        assert_eq!(parsed.rendered_text(), "body");
    }

    #[test]
    fn test_parse_rejects_duplicate_fields() {
        let content = "hash: a\nhash: b\n---\nbody";
        let err = parse_snapshot(content).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
