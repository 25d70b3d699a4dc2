use crate::{CreationStore, Result, StorageError};
use atelier_types::{CreationDetails, CreationId, CreationRecord, Principal};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct MemoryState {
    creations: HashMap<CreationId, CreationRecord>,
    creations_by_creator: HashMap<Principal, Vec<CreationId>>,
}

/// In-memory backend. Both mappings sit behind one lock so an insert is
/// never observable half-done.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CreationStore for MemoryStore {
    fn get_creation(&self, id: &CreationId) -> Result<Option<CreationRecord>> {
        Ok(self.state.read().creations.get(id).cloned())
    }

    fn contains_creation(&self, id: &CreationId) -> Result<bool> {
        Ok(self.state.read().creations.contains_key(id))
    }

    fn insert_creation(&self, id: &CreationId, record: &CreationRecord) -> Result<()> {
        let mut state = self.state.write();
        if state.creations.contains_key(id) {
            return Err(StorageError::DuplicateCreation(id.to_string()));
        }
        state.creations.insert(id.clone(), record.clone());
        state
            .creations_by_creator
            .entry(record.creator.clone())
            .or_default()
            .push(id.clone());
        Ok(())
    }

    fn replace_details(&self, id: &CreationId, details: &CreationDetails) -> Result<()> {
        let mut state = self.state.write();
        let record = state
            .creations
            .get_mut(id)
            .ok_or_else(|| StorageError::CreationMissing(id.to_string()))?;
        record.apply_details(details.clone());
        Ok(())
    }

    fn creation_ids_by_creator(&self, creator: &Principal) -> Result<Vec<CreationId>> {
        Ok(self
            .state
            .read()
            .creations_by_creator
            .get(creator)
            .cloned()
            .unwrap_or_default())
    }

    fn creation_count(&self) -> Result<u64> {
        Ok(self.state.read().creations.len() as u64)
    }
}
