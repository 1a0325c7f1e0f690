//! Response envelope unwrapping.
//!
//! The service answers with either `{"exception": {"message": ...}}` or
//! `{"rowset": {"rows": [...]}}`. Anything else is "nothing to report" in
//! lenient mode and a protocol error in strict mode.

use omni_core::{ResponseMode, ResultSet, Row};
use serde_json::Value;
use tracing::warn;

use crate::error::{ClientError, ClientResult};

/// Turn a response body into rows, or the remote exception into an error.
pub fn unwrap_response(body: &[u8], mode: ResponseMode) -> ClientResult<ResultSet> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => return fallback(mode, format!("body is not JSON: {e}")),
    };

    let Value::Object(mut envelope) = value else {
        return fallback(mode, "body is not a JSON object".to_string());
    };

    if let Some(exception) = envelope.get("exception") {
        return Err(ClientError::RemoteService(exception_message(exception)));
    }

    match envelope.remove("rowset") {
        Some(Value::Object(mut rowset)) => match rowset.remove("rows") {
            None | Some(Value::Null) => Ok(ResultSet::empty()),
            Some(Value::Array(rows)) => collect_rows(rows, mode),
            Some(_) => fallback(mode, "rowset.rows is not an array".to_string()),
        },
        Some(_) => fallback(mode, "rowset is not an object".to_string()),
        None => fallback(mode, "body has neither exception nor rowset".to_string()),
    }
}

fn collect_rows(rows: Vec<Value>, mode: ResponseMode) -> ClientResult<ResultSet> {
    let mut collected: Vec<Row> = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Value::Object(row) => collected.push(row),
            other => {
                if mode == ResponseMode::Strict {
                    return Err(ClientError::Protocol(format!(
                        "row {index} is not an object: {other}"
                    )));
                }
                warn!(index, "skipping non-object row");
            }
        }
    }
    Ok(ResultSet::from(collected))
}

fn exception_message(exception: &Value) -> String {
    exception
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| exception.to_string())
}

fn fallback(mode: ResponseMode, reason: String) -> ClientResult<ResultSet> {
    match mode {
        ResponseMode::Lenient => {
            warn!(%reason, "unrecognized response, returning no rows");
            Ok(ResultSet::empty())
        }
        ResponseMode::Strict => Err(ClientError::Protocol(reason)),
    }
}
