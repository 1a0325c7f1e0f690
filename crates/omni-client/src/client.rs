//! OmniClient, the entry point tying schema cache, synthesis and dispatch
//! together.

use std::collections::BTreeMap;

use omni_core::{
    ColumnValue, OmniConfig, RequestDescriptor, ResponseMode, ResultSet, RowSet, TablePath,
    TableSchema,
};
use omni_schema::SchemaStore;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::transport::{HyperTransport, Transport};
use crate::wire::Endpoint;
use crate::{dispatch, fetcher, synth};

/// Client for one ObjectServer REST endpoint.
///
/// Owns its schema cache; two clients sharing a cache directory share
/// entries through the files only.
pub struct OmniClient<T = HyperTransport> {
    transport: T,
    endpoint: Endpoint,
    store: SchemaStore,
    mode: ResponseMode,
}

impl OmniClient<HyperTransport> {
    /// Client over HTTP with a file-backed schema cache at the configured
    /// directory.
    pub fn new(config: &OmniConfig) -> ClientResult<Self> {
        let store = SchemaStore::open(&config.cache_dir());
        Self::with_transport(config, HyperTransport::new(), store)
    }
}

impl<T: Transport> OmniClient<T> {
    pub fn with_transport(config: &OmniConfig, transport: T, store: SchemaStore) -> ClientResult<Self> {
        let endpoint = Endpoint::new(config)?;
        debug!(url = %endpoint.base(), user = %config.user, "client created");
        Ok(Self {
            transport,
            endpoint,
            store,
            mode: config.response_mode,
        })
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Run `request`: synthesize the payload for writes, then dispatch.
    pub async fn send(&self, mut request: RequestDescriptor) -> ClientResult<ResultSet> {
        if request.verb.is_write() {
            if request.columns.is_empty() {
                return Err(ClientError::MissingColumns {
                    verb: request.verb,
                    table: request.path.clone(),
                });
            }
            let rowset = self.synthesize(&request.path, &request.columns).await?;
            request.attach_payload(rowset.into());
        }
        self.dispatch(&request).await
    }

    /// Dispatch a prepared request as-is.
    pub async fn dispatch(&self, request: &RequestDescriptor) -> ClientResult<ResultSet> {
        dispatch::dispatch(&self.transport, &self.endpoint, self.mode, request).await
    }

    /// The single-row payload `columns` would produce for `table`. Issues no
    /// write; may fetch and cache the schema.
    pub async fn synthesize(
        &self,
        table: &TablePath,
        columns: &BTreeMap<String, ColumnValue>,
    ) -> ClientResult<RowSet> {
        let schema = self.schema(table).await?;
        synth::synthesize(table, &schema, columns)
    }

    /// `table`'s schema from the cache, fetching it on a miss.
    pub async fn schema(&self, table: &TablePath) -> ClientResult<TableSchema> {
        fetcher::resolve_schema(&self.transport, &self.endpoint, &self.store, self.mode, table)
            .await
    }
}
