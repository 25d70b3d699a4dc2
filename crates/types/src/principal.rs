use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of raw bytes in a host account key.
pub const ACCOUNT_KEY_BYTES: usize = 32;
/// String length of an encoded account address (prefix + 64 hex chars).
pub const ACCOUNT_ADDRESS_LENGTH: usize = 1 + ACCOUNT_KEY_BYTES * 2;

/// Identity of the principal acting in a registry call.
///
/// The registry treats this as an opaque token and only ever compares it for
/// equality. Hosts that sign with 32-byte account keys use the `i`-prefixed
/// hex rendering produced by [`Principal::from_account_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Render a raw account key in the host address format.
    pub fn from_account_key(key: &[u8; ACCOUNT_KEY_BYTES]) -> Self {
        let mut encoded = String::with_capacity(ACCOUNT_ADDRESS_LENGTH);
        encoded.push('i');
        encoded.push_str(&hex::encode(key));
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identity is an `i`-prefixed account address.
    pub fn is_account_address(&self) -> bool {
        self.0.len() == ACCOUNT_ADDRESS_LENGTH
            && self.0.starts_with('i')
            && self.0[1..].bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Self(value)
    }
}
