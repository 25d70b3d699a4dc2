use crate::{CreationStore, Result, StorageError};
use atelier_types::{BlockHeight, CreationDetails, CreationId, CreationRecord, Principal};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional, Tree};
use std::path::Path;

const LATEST_HEIGHT_KEY: &[u8] = b"latest_height";

/// Sled-backed implementation.
///
/// Records are JSON encoded under their creation id. The creator index keeps
/// one JSON array of ids per creator, appended in registration order.
pub struct SledStore {
    db: Db,
    creations: Tree,
    creations_by_creator: Tree,
    metadata: Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref())?;
        let creations = db.open_tree("creations")?;
        let creations_by_creator = db.open_tree("creations_by_creator")?;
        let metadata = db.open_tree("metadata")?;

        tracing::debug!(
            path = %path.as_ref().display(),
            creations = creations.len(),
            "opened creation store"
        );

        Ok(Self {
            db,
            creations,
            creations_by_creator,
            metadata,
        })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Highest block height the host has handed out or observed.
    pub fn latest_height(&self) -> Result<BlockHeight> {
        Ok(self
            .metadata
            .get(LATEST_HEIGHT_KEY)?
            .as_deref()
            .and_then(decode_height)
            .unwrap_or(0))
    }

    /// Height following the latest recorded one. Does not move the counter.
    pub fn next_height(&self) -> Result<BlockHeight> {
        Ok(self.latest_height()?.saturating_add(1))
    }

    /// Record an externally supplied height. The counter never moves backwards.
    pub fn observe_height(&self, height: BlockHeight) -> Result<BlockHeight> {
        let stored = self.metadata.update_and_fetch(LATEST_HEIGHT_KEY, |old| {
            let current = old.and_then(decode_height).unwrap_or(0);
            Some(current.max(height).to_be_bytes().to_vec())
        })?;
        Ok(stored.as_deref().and_then(decode_height).unwrap_or(height))
    }
}

fn decode_height(bytes: &[u8]) -> Option<BlockHeight> {
    <[u8; 8]>::try_from(bytes).ok().map(u64::from_be_bytes)
}

fn abort<E: Into<StorageError>>(err: E) -> ConflictableTransactionError<StorageError> {
    ConflictableTransactionError::Abort(err.into())
}

fn unwrap_tx(err: TransactionError<StorageError>) -> StorageError {
    match err {
        TransactionError::Abort(err) => err,
        TransactionError::Storage(err) => StorageError::Database(err),
    }
}

impl CreationStore for SledStore {
    fn get_creation(&self, id: &CreationId) -> Result<Option<CreationRecord>> {
        self.creations
            .get(id.as_str().as_bytes())?
            .map(|v| serde_json::from_slice(&v))
            .transpose()
            .map_err(Into::into)
    }

    fn contains_creation(&self, id: &CreationId) -> Result<bool> {
        Ok(self.creations.contains_key(id.as_str().as_bytes())?)
    }

    fn insert_creation(&self, id: &CreationId, record: &CreationRecord) -> Result<()> {
        let key = id.as_str().as_bytes();
        let creator_key = record.creator.as_str().as_bytes();
        let data = serde_json::to_vec(record)?;

        (&self.creations, &self.creations_by_creator)
            .transaction(|(creations, by_creator)| {
                if creations.get(key)?.is_some() {
                    return Err(abort(StorageError::DuplicateCreation(id.to_string())));
                }
                creations.insert(key, data.clone())?;

                let mut ids: Vec<CreationId> = match by_creator.get(creator_key)? {
                    Some(raw) => serde_json::from_slice(&raw).map_err(abort)?,
                    None => Vec::new(),
                };
                ids.push(id.clone());
                let encoded = serde_json::to_vec(&ids).map_err(abort)?;
                by_creator.insert(creator_key, encoded)?;
                Ok(())
            })
            .map_err(unwrap_tx)
    }

    fn replace_details(&self, id: &CreationId, details: &CreationDetails) -> Result<()> {
        let key = id.as_str().as_bytes();

        self.creations
            .transaction(|creations| {
                let raw = creations
                    .get(key)?
                    .ok_or_else(|| abort(StorageError::CreationMissing(id.to_string())))?;
                let mut record: CreationRecord = serde_json::from_slice(&raw).map_err(abort)?;
                record.apply_details(details.clone());
                let encoded = serde_json::to_vec(&record).map_err(abort)?;
                creations.insert(key, encoded)?;
                Ok(())
            })
            .map_err(unwrap_tx)
    }

    fn creation_ids_by_creator(&self, creator: &Principal) -> Result<Vec<CreationId>> {
        Ok(self
            .creations_by_creator
            .get(creator.as_str().as_bytes())?
            .map(|v| serde_json::from_slice(&v))
            .transpose()?
            .unwrap_or_default())
    }

    fn creation_count(&self) -> Result<u64> {
        Ok(self.creations.len() as u64)
    }
}
