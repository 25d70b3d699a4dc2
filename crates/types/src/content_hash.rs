use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Byte length of a content digest.
pub const CONTENT_HASH_BYTES: usize = 32;

/// Errors emitted when decoding a content hash from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentHashError {
    #[error("content hash must be 64 hex characters, got {0}")]
    InvalidLength(usize),
    #[error("content hash must be valid hex: {0}")]
    InvalidHex(String),
}

/// 32-byte digest identifying the underlying content of a creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash([u8; CONTENT_HASH_BYTES]);

impl ContentHash {
    pub fn from_bytes(bytes: [u8; CONTENT_HASH_BYTES]) -> Self {
        ContentHash(bytes)
    }

    /// SHA-256 digest of raw content.
    pub fn digest(content: &[u8]) -> Self {
        ContentHash(Sha256::digest(content).into())
    }

    pub fn as_bytes(&self) -> &[u8; CONTENT_HASH_BYTES] {
        &self.0
    }

    /// Render as lowercase hexadecimal.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ContentHash> for String {
    fn from(value: ContentHash) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for ContentHash {
    type Error = ContentHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ContentHash {
    type Err = ContentHashError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() != CONTENT_HASH_BYTES * 2 {
            return Err(ContentHashError::InvalidLength(value.len()));
        }
        let mut hash = [0u8; CONTENT_HASH_BYTES];
        hex::decode_to_slice(value, &mut hash)
            .map_err(|err| ContentHashError::InvalidHex(err.to_string()))?;
        Ok(ContentHash(hash))
    }
}
