//! Storage backends for the creation registry.
//!
//! A backend holds the two registry mappings: creation id → record, and
//! creator → ids in registration order. [`CreationStore::insert_creation`]
//! writes both or neither.

use atelier_types::{CreationDetails, CreationId, CreationRecord, Principal};

pub mod memory;
pub mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Creation already stored: {0}")]
    DuplicateCreation(String),
    #[error("Creation not found: {0}")]
    CreationMissing(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstract storage trait
pub trait CreationStore: Send + Sync {
    fn get_creation(&self, id: &CreationId) -> Result<Option<CreationRecord>>;

    fn contains_creation(&self, id: &CreationId) -> Result<bool> {
        Ok(self.get_creation(id)?.is_some())
    }

    /// Store a new record and append its id to the creator's index.
    /// Fails with [`StorageError::DuplicateCreation`] without writing anything
    /// if the id is already present.
    fn insert_creation(&self, id: &CreationId, record: &CreationRecord) -> Result<()>;

    /// Overwrite title, description and category of an existing record.
    fn replace_details(&self, id: &CreationId, details: &CreationDetails) -> Result<()>;

    fn creation_ids_by_creator(&self, creator: &Principal) -> Result<Vec<CreationId>>;

    fn creation_count(&self) -> Result<u64>;
}

impl<S: CreationStore + ?Sized> CreationStore for std::sync::Arc<S> {
    fn get_creation(&self, id: &CreationId) -> Result<Option<CreationRecord>> {
        (**self).get_creation(id)
    }

    fn contains_creation(&self, id: &CreationId) -> Result<bool> {
        (**self).contains_creation(id)
    }

    fn insert_creation(&self, id: &CreationId, record: &CreationRecord) -> Result<()> {
        (**self).insert_creation(id, record)
    }

    fn replace_details(&self, id: &CreationId, details: &CreationDetails) -> Result<()> {
        (**self).replace_details(id, details)
    }

    fn creation_ids_by_creator(&self, creator: &Principal) -> Result<Vec<CreationId>> {
        (**self).creation_ids_by_creator(creator)
    }

    fn creation_count(&self) -> Result<u64> {
        (**self).creation_count()
    }
}
