//! BLAKE3 content hashing for fingerprint cache keys.

use blake3::Hasher;

use crate::embedding::TaskType;

/// Full 32-byte BLAKE3 digest of raw document bytes.
#[inline]
pub fn hash_content(bytes: &[u8]) -> [u8; 32] {
    *blake3::hash(bytes).as_bytes()
}

/// Everything besides the raw bytes that decides which vector a document embeds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyScope<'a> {
    /// Embedding model identifier.
    pub model: &'a str,
    pub task: TaskType,
    /// Identifier of the extractor that turned the bytes into text.
    pub extractor: &'a str,
    /// Character budget the extracted text was truncated to before embedding.
    pub max_chars: usize,
}

/// Cache key for a fingerprint of `content_hash` produced under `scope`.
///
/// The same bytes embed to a different vector under another model, usage mode,
/// extractor or truncation budget, so all of them are part of the key. Strings are
/// length-prefixed so adjacent fields cannot run into each other.
pub fn fingerprint_key(content_hash: &[u8; 32], scope: &KeyScope<'_>) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(content_hash);
    hasher.update(&(scope.model.len() as u64).to_le_bytes());
    hasher.update(scope.model.as_bytes());
    hasher.update(&(scope.extractor.len() as u64).to_le_bytes());
    hasher.update(scope.extractor.as_bytes());
    hasher.update(&(scope.max_chars as u64).to_le_bytes());
    hasher.update(scope.task.as_api_str().as_bytes());
    *hasher.finalize().as_bytes()
}

/// Lower-case hex rendering, used for snapshot files and log fields.
pub fn to_hex(hash: &[u8; 32]) -> String {
    blake3::Hash::from_bytes(*hash).to_hex().to_string()
}

/// Parses the output of [`to_hex`].
pub fn from_hex(hex: &str) -> Option<[u8; 32]> {
    blake3::Hash::from_hex(hex).ok().map(|h| *h.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_content_determinism() {
        let bytes = b"%PDF-1.7 proposal body";

        let hash1 = hash_content(bytes);
        let hash2 = hash_content(bytes);

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 32);
    }

    #[test]
    fn test_hash_content_single_byte_change() {
        let a = hash_content(b"quantum sensing for soil moisture");
        let b = hash_content(b"quantum sensing for soil moisturE");
        assert_ne!(a, b);
    }

    fn scope(model: &str) -> KeyScope<'_> {
        KeyScope {
            model,
            task: TaskType::RetrievalDocument,
            extractor: "pdf-extract",
            max_chars: 10_000,
        }
    }

    #[test]
    fn test_fingerprint_key_scope_sensitivity() {
        let content = hash_content(b"doc");
        let base = scope("models/text-embedding-004");
        let keys: HashSet<_> = [
            fingerprint_key(&content, &base),
            fingerprint_key(&content, &scope("models/embedding-001")),
            fingerprint_key(
                &content,
                &KeyScope {
                    task: TaskType::RetrievalQuery,
                    ..base
                },
            ),
            fingerprint_key(
                &content,
                &KeyScope {
                    extractor: "utf8",
                    ..base
                },
            ),
            fingerprint_key(
                &content,
                &KeyScope {
                    max_chars: 5,
                    ..base
                },
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(keys.len(), 5);
        assert_eq!(fingerprint_key(&content, &base), fingerprint_key(&content, &base));
    }

    #[test]
    fn test_fingerprint_key_length_prefix_prevents_ambiguity() {
        let content = hash_content(b"doc");
        let a = KeyScope {
            extractor: "x",
            ..scope("model-a")
        };
        let b = KeyScope {
            extractor: "ax",
            ..scope("model-")
        };
        assert_ne!(fingerprint_key(&content, &a), fingerprint_key(&content, &b));
    }

    #[test]
    fn test_hex_roundtrip() {
        let hash = hash_content(b"roundtrip");
        let hex = to_hex(&hash);
        assert_eq!(hex.len(), 64);
        assert_eq!(from_hex(&hex), Some(hash));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(from_hex("not-hex"), None);
        assert_eq!(from_hex("abcd"), None);
    }
}
