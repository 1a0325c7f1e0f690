//! Error types for the schema cache.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for schema cache operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while reading or writing cached schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("couldn't create schema cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("cached schema for {key} is corrupt ({reason}); delete it to refetch")]
    Corrupt { key: String, reason: String },
}
