//! Schema discovery from the remote catalog.

use omni_core::{ResponseMode, TablePath, TableSchema, TypeTag};
use omni_schema::SchemaStore;
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::unwrap_response;
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;
use crate::wire::Endpoint;

/// Cached schema for `table`, fetching and caching it on a miss.
pub async fn resolve_schema<T: Transport>(
    transport: &T,
    endpoint: &Endpoint,
    store: &SchemaStore,
    mode: ResponseMode,
    table: &TablePath,
) -> ClientResult<TableSchema> {
    if let Some(schema) = store.get(table)? {
        return Ok(schema);
    }
    fetch_schema(transport, endpoint, store, mode, table).await
}

/// Query the catalog for `table`'s columns and write the result to `store`.
///
/// Type codes: 1 → timestamp, 2 and 10 → string, anything else → integer.
pub async fn fetch_schema<T: Transport>(
    transport: &T,
    endpoint: &Endpoint,
    store: &SchemaStore,
    mode: ResponseMode,
    table: &TablePath,
) -> ClientResult<TableSchema> {
    let request = endpoint.catalog_request(table)?;
    debug!(%table, "fetching column types from catalog");

    let response = transport.send(request, endpoint.timeout()).await?;
    let rows = unwrap_response(response.body(), mode).map_err(|e| match e {
        ClientError::RemoteService(message) => ClientError::Catalog {
            table: table.clone(),
            message,
        },
        other => other,
    })?;

    let mut schema = TableSchema::new();
    for row in rows.rows() {
        let name = row.get("ColumnName").and_then(Value::as_str);
        let code = row.get("DataType").and_then(type_code);
        match (name, code) {
            (Some(name), Some(code)) => schema.insert(name.to_string(), TypeTag::from_type_code(code)),
            _ => warn!(%table, ?row, "skipping catalog row without ColumnName/DataType"),
        }
    }

    // An empty catalog answer means the table doesn't exist. Caching it
    // would make every later write fail with UnknownColumn.
    if schema.is_empty() {
        return Err(ClientError::UnknownTable(table.clone()));
    }

    store.put(table, &schema)?;
    debug!(%table, columns = schema.len(), "schema fetched");
    Ok(schema)
}

/// `DataType` arrives as a JSON number; fractional encodings are truncated.
fn type_code(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}
