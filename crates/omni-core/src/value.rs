//! Raw column values supplied by callers for writes.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A caller-supplied column value, classified by representation.
///
/// The classification decides how the value is coerced for numeric
/// columns. Values arriving as JSON are classified once at the boundary
/// (see the `From<serde_json::Value>` impl); everything downstream matches
/// on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ColumnValue {
    Integer(i64),
    Float(f64),
    String(String),
    /// Any other shape (bool, null, array, object).
    Other(Value),
}

impl ColumnValue {
    /// Name of the value's representation, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            ColumnValue::Integer(_) => "integer",
            ColumnValue::Float(_) => "float",
            ColumnValue::String(_) => "string",
            ColumnValue::Other(Value::Null) => "null",
            ColumnValue::Other(Value::Bool(_)) => "bool",
            ColumnValue::Other(Value::Number(_)) => "number",
            ColumnValue::Other(Value::String(_)) => "string",
            ColumnValue::Other(Value::Array(_)) => "array",
            ColumnValue::Other(Value::Object(_)) => "object",
        }
    }

    /// The value as it goes over the wire, unchanged.
    pub fn to_json(&self) -> Value {
        self.clone().into()
    }
}

impl From<Value> for ColumnValue {
    fn from(value: Value) -> Self {
        match value {
            // Integers beyond `i64` are floats, so one truncation rule
            // covers every non-`i64` number.
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => ColumnValue::Integer(i),
                (None, Some(f)) => ColumnValue::Float(f),
                (None, None) => ColumnValue::Other(Value::Number(n)),
            },
            Value::String(s) => ColumnValue::String(s),
            other => ColumnValue::Other(other),
        }
    }
}

impl From<ColumnValue> for Value {
    fn from(value: ColumnValue) -> Self {
        match value {
            ColumnValue::Integer(i) => Value::from(i),
            ColumnValue::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            ColumnValue::String(s) => Value::String(s),
            ColumnValue::Other(v) => v,
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<i32> for ColumnValue {
    fn from(value: i32) -> Self {
        ColumnValue::Integer(value.into())
    }
}

impl From<u32> for ColumnValue {
    fn from(value: u32) -> Self {
        ColumnValue::Integer(value.into())
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Float(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::String(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::String(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Other(Value::Bool(value))
    }
}
