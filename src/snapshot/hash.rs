//! Content fingerprints for prompts and templates.
//!
//! Hashes are the first 12 hex characters (48 bits) of a SHA-256 digest:
//! short enough for filenames, ample for corpora in the thousands. If the
//! corpus grows past the low millions, lengthen [`HASH_LENGTH`] rather than
//! changing the algorithm.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
pub const HASH_LENGTH: usize = 12;

/// Fingerprint of rendered prompt text.
///
/// Deterministic and unsalted: equal inputs always yield equal hashes.
pub fn compute_prompt_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_LENGTH);
    hash
}

/// Fingerprint of a raw (pre-substitution) template source.
pub fn compute_template_version(source: &str) -> String {
    compute_prompt_hash(source)
}

/// Whether `value` has the shape of a prompt hash.
pub fn is_valid_hash(value: &str) -> bool {
    value.len() == HASH_LENGTH
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_vectors() {
        // SHA-256("abc") = ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad
        assert_eq!(compute_prompt_hash("abc"), "ba7816bf8f01");
        // SHA-256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(compute_prompt_hash(""), "e3b0c44298fc");
    }

    #[test]
    fn test_hash_is_deterministic() {
        let text = "Research dairy and acne.";
        assert_eq!(compute_prompt_hash(text), compute_prompt_hash(text));
    }

    #[test]
    fn test_hash_differs_for_different_text() {
        assert_ne!(compute_prompt_hash("abc"), compute_prompt_hash("abd"));
        assert_ne!(compute_prompt_hash("abc"), compute_prompt_hash("abc\n"));
    }

    #[test]
    fn test_hash_shape() {
        let hash = compute_prompt_hash("日本語 🎉");
        assert_eq!(hash.len(), HASH_LENGTH);
        assert!(is_valid_hash(&hash));
    }

    #[test]
    fn test_template_version_uses_same_function() {
        let source = "Hello {{topic.entity}}";
        assert_eq!(compute_template_version(source), compute_prompt_hash(source));
    }

    #[test]
    fn test_is_valid_hash() {
        assert!(is_valid_hash("a1b2c3d4e5f6"));
        assert!(!is_valid_hash("A1B2C3D4E5F6"));
        assert!(!is_valid_hash("a1b2c3"));
        assert!(!is_valid_hash("a1b2c3d4e5fg"));
        assert!(!is_valid_hash("../../etc/pa"));
    }
}
