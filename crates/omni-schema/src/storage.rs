//! Storage backends for the schema cache.
//!
//! Backends deal in raw bytes under `database.table` keys; encoding is the
//! store's job.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{SchemaError, SchemaResult};

/// Byte-level key-value storage behind a `SchemaStore`.
pub trait SchemaStorage: Send + Sync {
    /// Bytes stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> SchemaResult<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous value.
    fn save(&self, key: &str, bytes: &[u8]) -> SchemaResult<()>;

    /// Drop the value under `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> SchemaResult<bool>;
}

// ── Files ──────────────────────────────────────────────────────────

/// One `{key}.json` file per table under a cache directory.
///
/// The directory is created (with parents) on first save, not on open.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the file holding `key`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn ensure_dir(&self) -> SchemaResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SchemaError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }
}

impl SchemaStorage for FileStorage {
    fn load(&self, key: &str) -> SchemaResult<Option<Vec<u8>>> {
        let path = self.file_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SchemaError::Read(format!("{}: {e}", path.display()))),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> SchemaResult<()> {
        self.ensure_dir()?;
        let path = self.file_path(key);
        std::fs::write(&path, bytes)
            .map_err(|e| SchemaError::Write(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "schema file written");
        Ok(())
    }

    fn remove(&self, key: &str) -> SchemaResult<bool> {
        let path = self.file_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SchemaError::Write(format!("{}: {e}", path.display()))),
        }
    }
}

// ── Memory ─────────────────────────────────────────────────────────

/// Process-local storage, for tests and callers that don't want files.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaStorage for MemoryStorage {
    fn load(&self, key: &str) -> SchemaResult<Option<Vec<u8>>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> SchemaResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> SchemaResult<bool> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(key).is_some())
    }
}
