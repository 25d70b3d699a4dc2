use crate::{ContentHash, Principal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger sequence counter (block height) supplied by the host.
pub type BlockHeight = u64;

/// Caller-supplied identifier of a creation. Unique across the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreationId(String);

impl CreationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CreationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CreationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ambient inputs of a single registry call, provided by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Principal the host authenticated as the sender of this call.
    pub caller: Principal,
    /// Sequence counter at the time of the call.
    pub block_height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, block_height: BlockHeight) -> Self {
        Self {
            caller: caller.into(),
            block_height,
        }
    }
}

/// The fields of a creation its creator may change after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationDetails {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl CreationDetails {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }
}

/// Registration request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationRegistration {
    pub details: CreationDetails,
    pub content_hash: ContentHash,
}

impl CreationRegistration {
    pub fn new(details: CreationDetails, content_hash: ContentHash) -> Self {
        Self {
            details,
            content_hash,
        }
    }
}

/// Metadata stored for a registered creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationRecord {
    /// Registering principal. Fixed at registration.
    pub creator: Principal,
    pub title: String,
    pub description: String,
    /// Fixed at registration.
    pub content_hash: ContentHash,
    /// Block height at registration. Fixed at registration.
    pub timestamp: BlockHeight,
    pub category: String,
}

impl CreationRecord {
    /// Build the record a successful registration stores.
    pub fn registered(registration: CreationRegistration, ctx: &CallContext) -> Self {
        let CreationDetails {
            title,
            description,
            category,
        } = registration.details;
        Self {
            creator: ctx.caller.clone(),
            title,
            description,
            content_hash: registration.content_hash,
            timestamp: ctx.block_height,
            category,
        }
    }

    /// Replace the mutable fields, leaving creator, hash and timestamp as they are.
    pub fn apply_details(&mut self, details: CreationDetails) {
        self.title = details.title;
        self.description = details.description;
        self.category = details.category;
    }

    pub fn details(&self) -> CreationDetails {
        CreationDetails::new(&self.title, &self.description, &self.category)
    }

    pub fn is_created_by(&self, principal: &Principal) -> bool {
        &self.creator == principal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CreationRecord {
        CreationRecord::registered(
            CreationRegistration::new(
                CreationDetails::new("T", "D", "art"),
                ContentHash::from_bytes([9u8; 32]),
            ),
            &CallContext::new("alice", 100),
        )
    }

    #[test]
    fn registration_takes_creator_and_height_from_context() {
        let record = sample();
        assert_eq!(record.creator, Principal::new("alice"));
        assert_eq!(record.timestamp, 100);
        assert_eq!(record.details(), CreationDetails::new("T", "D", "art"));
    }

    #[test]
    fn apply_details_leaves_fixed_fields() {
        let mut record = sample();
        record.apply_details(CreationDetails::new("T2", "D2", "craft"));
        assert_eq!(record.title, "T2");
        assert_eq!(record.description, "D2");
        assert_eq!(record.category, "craft");
        assert_eq!(record.creator, Principal::new("alice"));
        assert_eq!(record.content_hash, ContentHash::from_bytes([9u8; 32]));
        assert_eq!(record.timestamp, 100);
    }

    #[test]
    fn record_json_uses_snake_case_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["creator"], "alice");
        assert_eq!(value["content_hash"], "09".repeat(32));
        assert_eq!(value["timestamp"], 100);
        assert_eq!(value["category"], "art");
    }
}
