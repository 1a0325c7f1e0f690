//! Typed access to cached table schemas.

use std::path::Path;
use std::sync::Arc;

use omni_core::{TablePath, TableSchema};
use tracing::debug;

use crate::error::{SchemaError, SchemaResult};
use crate::storage::{FileStorage, MemoryStorage, SchemaStorage};

/// Schema cache keyed by `database.table`.
#[derive(Clone)]
pub struct SchemaStore {
    storage: Arc<dyn SchemaStorage>,
}

impl SchemaStore {
    /// File-backed store rooted at `dir`. The directory is created on the
    /// first `put`.
    pub fn open(dir: &Path) -> Self {
        debug!(dir = %dir.display(), "schema store opened");
        Self::with_storage(Arc::new(FileStorage::new(dir)))
    }

    /// Ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn SchemaStorage>) -> Self {
        Self { storage }
    }

    /// Cached schema for `path`, or `None` if the table was never cached.
    ///
    /// An entry that exists but doesn't decode is an error rather than a
    /// miss, so a damaged cache is never silently refetched over.
    pub fn get(&self, path: &TablePath) -> SchemaResult<Option<TableSchema>> {
        let key = path.cache_key();
        match self.storage.load(&key)? {
            Some(bytes) => {
                let schema: TableSchema =
                    serde_json::from_slice(&bytes).map_err(|e| SchemaError::Corrupt {
                        key: key.clone(),
                        reason: e.to_string(),
                    })?;
                debug!(%key, columns = schema.len(), "schema cache hit");
                Ok(Some(schema))
            }
            None => {
                debug!(%key, "schema cache miss");
                Ok(None)
            }
        }
    }

    /// Store `schema` for `path`, overwriting any previous entry.
    pub fn put(&self, path: &TablePath, schema: &TableSchema) -> SchemaResult<()> {
        let key = path.cache_key();
        let bytes =
            serde_json::to_vec(schema).map_err(|e| SchemaError::Serialize(e.to_string()))?;
        self.storage.save(&key, &bytes)?;
        debug!(%key, columns = schema.len(), "schema cached");
        Ok(())
    }

    /// Forget the cached schema for `path`. Returns true if one existed.
    pub fn remove(&self, path: &TablePath) -> SchemaResult<bool> {
        let key = path.cache_key();
        let existed = self.storage.remove(&key)?;
        debug!(%key, existed, "schema forgotten");
        Ok(existed)
    }
}
