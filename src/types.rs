//! Core value types.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw MD5 digest bytes
pub type Hash = [u8; 16];

/// Length of a hex-encoded digest artifact
pub const HASH_HEX_LEN: usize = 32;

/// Digest of the empty byte stream; the aggregate of a directory without non-empty files.
pub const EMPTY_DIGEST: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// A 128-bit digest encoded as exactly 32 lowercase hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigestArtifact(String);

impl DigestArtifact {
    /// Build from raw digest bytes.
    pub fn from_hash(hash: &Hash) -> Self {
        Self(hex::encode(hash))
    }

    /// Validate and normalize a hex string. Uppercase input is lowercased.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.len() != HASH_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StorageError::InvalidArtifact(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// On-disk artifact line: the digest plus a single trailing newline.
    pub fn to_artifact_line(&self) -> String {
        format!("{}\n", self.0)
    }
}

impl fmt::Display for DigestArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DigestArtifact {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DigestArtifact> for String {
    fn from(value: DigestArtifact) -> Self {
        value.0
    }
}
