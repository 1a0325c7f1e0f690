//! Per-table schema cache.
//!
//! Maps `database.table` to the column → type-tag mapping discovered from
//! the remote catalog. Entries are written once and never refreshed by the
//! client; a stale entry is cleared by deleting its file (or with
//! `omni schema forget`).
//!
//! # Architecture
//!
//! ```text
//! SchemaStore (Clone, owned by the client)
//!   └── Arc<dyn SchemaStorage>
//!         ├── FileStorage   {cache_dir}/{database}.{table}.json
//!         └── MemoryStorage HashMap, for tests and embedding
//! ```
//!
//! Nothing is locked on disk. Two processes populating the same entry at
//! once both fetch and the last write wins.

pub mod error;
pub mod storage;
pub mod store;

pub use error::{SchemaError, SchemaResult};
pub use storage::{FileStorage, MemoryStorage, SchemaStorage};
pub use store::SchemaStore;
