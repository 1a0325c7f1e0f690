//! Payload synthesis: typed `rowset` bodies for Insert/Update.
//!
//! Every column in the request must be declared in the table's schema.
//! Columns declared `integer` or `utc` are coerced to integers:
//!
//! | value    | result                                         |
//! |----------|------------------------------------------------|
//! | Integer  | unchanged                                      |
//! | String   | parsed as base-10 `i64`, else `TypeConversion` |
//! | Float    | truncated toward zero                          |
//! | other    | `TypeMismatch`                                 |
//!
//! `string` columns take the value as given, whatever its shape.

use std::collections::BTreeMap;

use omni_core::{ColumnDescriptor, ColumnValue, Row, RowSet, TablePath, TableSchema, TypeTag};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Build the single-row `RowSet` for `columns` against `schema`.
///
/// Fails on the first unknown or uncoercible column; no partial payload is
/// returned.
pub fn synthesize(
    table: &TablePath,
    schema: &TableSchema,
    columns: &BTreeMap<String, ColumnValue>,
) -> ClientResult<RowSet> {
    let mut coldesc = Vec::with_capacity(columns.len());
    let mut row = Row::new();

    for (name, raw) in columns {
        let type_tag = schema.get(name).ok_or_else(|| ClientError::UnknownColumn {
            table: table.clone(),
            column: name.clone(),
        })?;

        row.insert(name.clone(), coerce(name, type_tag, raw)?);
        coldesc.push(ColumnDescriptor {
            type_tag,
            name: name.clone(),
        });
    }

    Ok(RowSet {
        coldesc,
        rows: vec![row],
    })
}

/// Coerce one value for a column declared as `type_tag`.
pub fn coerce(column: &str, type_tag: TypeTag, raw: &ColumnValue) -> ClientResult<Value> {
    if !type_tag.is_numeric() {
        return Ok(raw.to_json());
    }
    coerce_integer(column, type_tag, raw).map(Value::from)
}

fn coerce_integer(column: &str, type_tag: TypeTag, raw: &ColumnValue) -> ClientResult<i64> {
    let conversion_error = |value: String| ClientError::TypeConversion {
        column: column.to_string(),
        value,
        declared: type_tag,
    };

    match raw {
        ColumnValue::Integer(i) => Ok(*i),
        ColumnValue::String(s) => s.parse::<i64>().map_err(|_| conversion_error(s.clone())),
        ColumnValue::Float(f) => truncate(*f).ok_or_else(|| conversion_error(f.to_string())),
        ColumnValue::Other(_) => Err(ClientError::TypeMismatch {
            column: column.to_string(),
            shape: raw.shape(),
        }),
    }
}

/// Truncate toward zero. `None` for NaN, infinities and out-of-range values.
fn truncate(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let t = f.trunc();
    if t.is_finite() && t >= -LIMIT && t < LIMIT {
        Some(t as i64)
    } else {
        None
    }
}
