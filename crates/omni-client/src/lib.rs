//! CRUD requests against the OMNIbus ObjectServer REST API.
//!
//! Callers describe a request as verb + `database/table` + filter + column
//! values. Writes need the API's `rowset` body, which names every column
//! with its declared type; the client discovers those types from the
//! remote catalog once per table and caches them.
//!
//! # Architecture
//!
//! ```text
//! OmniClient::send(RequestDescriptor)
//!   ├── Insert/Update only:
//!   │   ├── SchemaStore::get ──miss──► fetcher::fetch_schema ──► SchemaStore::put
//!   │   └── synth::synthesize(schema, columns) → RowSet → attached payload
//!   └── dispatch::dispatch
//!         ├── wire::Endpoint builds the HTTP request (Basic auth, Connection: close)
//!         ├── Transport::send (HyperTransport, one connection per call)
//!         └── envelope::unwrap_response → ResultSet | RemoteService error
//! ```
//!
//! There is no retry, pooling, or background work: each call is one
//! request, bounded only by the configured timeout.

pub mod client;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod synth;
pub mod transport;
pub mod wire;

#[cfg(test)]
mod testing;

pub use client::OmniClient;
pub use error::{ClientError, ClientResult};
pub use transport::{HyperTransport, Transport, TransportError};
pub use wire::Endpoint;
