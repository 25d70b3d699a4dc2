//! Creation registry implementation
//!
//! Enforces the registry rules on top of any [`CreationStore`]: ids are
//! registered once, only the creator may edit a record, and creator, content
//! hash and timestamp are fixed at registration.

use crate::errors::*;
use atelier_storage::{CreationStore, MemoryStore, StorageError};
use atelier_types::{
    CallContext, CreationDetails, CreationId, CreationRecord, CreationRegistration, Principal,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Creation registry
///
/// Every call runs inside one critical section over the whole store, so the
/// existence check in [`register`](Self::register) and the insert that
/// follows it cannot interleave with another call.
#[derive(Debug)]
pub struct CreationRegistry<S = MemoryStore> {
    store: Mutex<S>,
}

impl CreationRegistry<MemoryStore> {
    /// Create a registry backed by memory
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for CreationRegistry<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CreationStore> CreationRegistry<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Register a new creation owned by the caller.
    ///
    /// The record takes its creator from `ctx.caller` and its timestamp from
    /// `ctx.block_height`. Fails with [`ContractError::AlreadyRegistered`] if
    /// the id is taken, leaving the existing record as it was.
    pub fn register(
        &self,
        id: CreationId,
        registration: CreationRegistration,
        ctx: &CallContext,
    ) -> Result<CreationId> {
        let store = self.store.lock();

        if store.contains_creation(&id)? {
            warn!(
                creation_id = %id,
                caller = %ctx.caller,
                "Registration rejected: id already registered"
            );
            return Err(ContractError::AlreadyRegistered.into());
        }

        let record = CreationRecord::registered(registration, ctx);
        match store.insert_creation(&id, &record) {
            Ok(()) => {}
            // Another registry sharing the backing store won the race.
            Err(StorageError::DuplicateCreation(_)) => {
                warn!(
                    creation_id = %id,
                    caller = %ctx.caller,
                    "Registration rejected: id already registered"
                );
                return Err(ContractError::AlreadyRegistered.into());
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            creation_id = %id,
            creator = %record.creator,
            height = record.timestamp,
            content_hash = %record.content_hash,
            "Creation registered"
        );
        Ok(id)
    }

    /// Fetch a creation record. Only a storage failure yields an error.
    pub fn get(&self, id: &CreationId) -> Result<Option<CreationRecord>> {
        let record = self.store.lock().get_creation(id)?;
        debug!(creation_id = %id, found = record.is_some(), "Creation lookup");
        Ok(record)
    }

    /// Replace title, description and category of an existing creation.
    ///
    /// Checks run in order: [`ContractError::NotFound`] for an unknown id,
    /// then [`ContractError::NotAuthorized`] if the caller is not the creator.
    pub fn update(
        &self,
        id: &CreationId,
        details: CreationDetails,
        ctx: &CallContext,
    ) -> Result<()> {
        let store = self.store.lock();

        let Some(record) = store.get_creation(id)? else {
            warn!(
                creation_id = %id,
                caller = %ctx.caller,
                "Update rejected: creation not found"
            );
            return Err(ContractError::NotFound.into());
        };

        if !record.is_created_by(&ctx.caller) {
            warn!(
                creation_id = %id,
                caller = %ctx.caller,
                creator = %record.creator,
                "Update rejected: caller is not the creator"
            );
            return Err(ContractError::NotAuthorized.into());
        }

        store.replace_details(id, &details)?;

        info!(creation_id = %id, height = ctx.block_height, "Creation details updated");
        Ok(())
    }

    /// Ids registered by `creator`, oldest first.
    pub fn creations_by_creator(&self, creator: &Principal) -> Result<Vec<CreationId>> {
        Ok(self.store.lock().creation_ids_by_creator(creator)?)
    }

    /// Number of registered creations.
    pub fn len(&self) -> Result<u64> {
        Ok(self.store.lock().creation_count()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
