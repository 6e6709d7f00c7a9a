// crates/data-context-core/src/core/hashing.rs
// ============================================================================
// Module: Canonical Document Encoding
// Description: RFC 8785 JSON canonicalization and content digests for stored documents.
// Purpose: Give every store backend identical bytes and integrity hashes per document.
// Dependencies: serde, serde_json, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Suites and validation results are persisted as RFC 8785 (JCS) canonical
//! JSON so that equal documents always produce equal bytes. Durable
//! backends record a SHA-256 digest next to each document and verify it on
//! read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported digest algorithms for stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the stable label recorded alongside stored digests.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// Default digest algorithm.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

/// Lowercase hex digest of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while encoding or decoding stored documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Canonical serialization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
    /// Stored bytes are not a valid document.
    #[error("failed to decode json: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value.
///
/// # Errors
///
/// Returns [`DocumentError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, DocumentError> {
    serde_jcs::to_vec(value).map_err(|err| DocumentError::Canonicalization(err.to_string()))
}

/// Decodes a stored JSON document.
///
/// # Errors
///
/// Returns [`DocumentError::Decode`] when the bytes do not describe `T`.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DocumentError> {
    serde_json::from_slice(bytes).map_err(|err| DocumentError::Decode(err.to_string()))
}

/// Hashes raw bytes with the provided algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let digest = Sha256::digest(bytes);
            HashDigest {
                algorithm,
                value: hex_encode(&digest),
            }
        }
    }
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions unwrap known-good inputs."
    )]

    use super::*;

    #[test]
    fn canonical_bytes_sort_object_keys() {
        let value = serde_json::json!({"b": 1, "a": [true, null]});
        let bytes = canonical_json_bytes(&value).unwrap();
        assert_eq!(bytes, br#"{"a":[true,null],"b":1}"#);
    }

    #[test]
    fn sha256_digest_is_lowercase_hex() {
        let digest = hash_bytes(HashAlgorithm::Sha256, b"abc");
        assert_eq!(
            digest.value,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
