//! Error types for the omnilink client.

use omni_core::{PathError, TablePath, TypeTag, Verb};
use omni_schema::SchemaError;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can end a client operation. None of these are retried.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    PathFormat(#[from] PathError),

    #[error("column not found in {table}: {column}")]
    UnknownColumn { table: TablePath, column: String },

    #[error("couldn't convert column value to integer: {value} ({declared})")]
    TypeConversion {
        column: String,
        value: String,
        declared: TypeTag,
    },

    #[error("couldn't convert given parameter: {column} which is of type {shape}")]
    TypeMismatch { column: String, shape: &'static str },

    #[error("{verb} request for {table} has no columns")]
    MissingColumns { verb: Verb, table: TablePath },

    #[error("{verb} request for {table} has no synthesized payload")]
    MissingPayload { verb: Verb, table: TablePath },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Schema cache failure, including an uncreatable cache directory.
    #[error("schema cache: {0}")]
    Cache(#[from] SchemaError),

    /// The server answered with an `exception` envelope.
    #[error("OMNIbus: {0}")]
    RemoteService(String),

    #[error("catalog lookup for {table} failed: {message}")]
    Catalog { table: TablePath, message: String },

    #[error("catalog has no columns for {0}")]
    UnknownTable(TablePath),

    /// Strict mode only: the response was neither an exception nor a rowset.
    #[error("unexpected response: {0}")]
    Protocol(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
