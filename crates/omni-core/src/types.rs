//! Shared types used across omnilink crates.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::TablePath;
use crate::value::ColumnValue;

// ── Verbs ──────────────────────────────────────────────────────────

/// The four operations the REST API supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Read,
    Insert,
    Update,
    Delete,
}

impl Verb {
    /// HTTP method used for this verb.
    pub fn method(self) -> &'static str {
        match self {
            Verb::Read => "GET",
            Verb::Insert => "POST",
            Verb::Update => "PATCH",
            Verb::Delete => "DELETE",
        }
    }

    /// Whether this verb carries a synthesized `rowset` body.
    pub fn is_write(self) -> bool {
        matches!(self, Verb::Insert | Verb::Update)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// Accepts either the HTTP method or the verb name, case-insensitively.
impl FromStr for Verb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" | "READ" | "SELECT" => Ok(Verb::Read),
            "POST" | "INSERT" => Ok(Verb::Insert),
            "PATCH" | "UPDATE" => Ok(Verb::Update),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(format!("unknown verb: {s}")),
        }
    }
}

// ── Schema ─────────────────────────────────────────────────────────

/// Semantic type of a column.
///
/// Timestamps travel as `utc`, the ObjectServer's name for them, in both
/// cache files and `coldesc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Integer,
    #[serde(rename = "utc", alias = "timestamp")]
    Timestamp,
    String,
}

impl TypeTag {
    /// Map a catalog `DataType` code to a tag. Unrecognized codes are
    /// integers.
    pub fn from_type_code(code: i64) -> Self {
        match code {
            1 => TypeTag::Timestamp,
            2 | 10 => TypeTag::String,
            _ => TypeTag::Integer,
        }
    }

    /// Whether values for this tag are coerced to integers.
    pub fn is_numeric(self) -> bool {
        matches!(self, TypeTag::Integer | TypeTag::Timestamp)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Integer => "integer",
            TypeTag::Timestamp => "utc",
            TypeTag::String => "string",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column name → type tag for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: BTreeMap<String, TypeTag>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: &str, tag: TypeTag) -> Self {
        self.columns.insert(name.to_string(), tag);
        self
    }

    pub fn insert(&mut self, name: String, tag: TypeTag) {
        self.columns.insert(name, tag);
    }

    pub fn get(&self, name: &str) -> Option<TypeTag> {
        self.columns.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeTag)> {
        self.columns.iter().map(|(name, tag)| (name.as_str(), *tag))
    }
}

impl FromIterator<(String, TypeTag)> for TableSchema {
    fn from_iter<I: IntoIterator<Item = (String, TypeTag)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

// ── Write payload ──────────────────────────────────────────────────

/// A single row: column name → value.
pub type Row = Map<String, Value>;

/// `{type, name}` entry of a rowset's `coldesc` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    pub name: String,
}

/// Column descriptors plus row values, the body shape of every write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub coldesc: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
}

/// Top-level write body: `{"rowset": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritePayload {
    pub rowset: RowSet,
}

impl From<RowSet> for WritePayload {
    fn from(rowset: RowSet) -> Self {
        Self { rowset }
    }
}

// ── Requests ───────────────────────────────────────────────────────

/// One unit of work submitted to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub verb: Verb,
    pub path: TablePath,
    /// WHERE-clause predicate. Selects rows for Read/Update/Delete,
    /// ignored for Insert.
    #[serde(default)]
    pub filter: String,
    /// Values to write. Required for Insert/Update, ignored otherwise.
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnValue>,
    /// Columns to return. Read only.
    #[serde(default)]
    pub projection: Vec<String>,
    #[serde(skip)]
    payload: Option<WritePayload>,
}

impl RequestDescriptor {
    pub fn new(verb: Verb, path: TablePath) -> Self {
        Self {
            verb,
            path,
            filter: String::new(),
            columns: BTreeMap::new(),
            projection: Vec::new(),
            payload: None,
        }
    }

    pub fn read(path: TablePath) -> Self {
        Self::new(Verb::Read, path)
    }

    pub fn insert(path: TablePath) -> Self {
        Self::new(Verb::Insert, path)
    }

    pub fn update(path: TablePath, filter: &str) -> Self {
        Self::new(Verb::Update, path).filter(filter)
    }

    pub fn delete(path: TablePath, filter: &str) -> Self {
        Self::new(Verb::Delete, path).filter(filter)
    }

    pub fn filter(mut self, filter: &str) -> Self {
        self.filter = filter.to_string();
        self
    }

    pub fn column(mut self, name: &str, value: impl Into<ColumnValue>) -> Self {
        self.columns.insert(name.to_string(), value.into());
        self
    }

    pub fn projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The synthesized write body, present once the client has prepared an
    /// Insert/Update.
    pub fn payload(&self) -> Option<&WritePayload> {
        self.payload.as_ref()
    }

    /// Attach a synthesized body. Called by the client, not by callers.
    pub fn attach_payload(&mut self, payload: WritePayload) {
        self.payload = Some(payload);
    }
}

// ── Results ────────────────────────────────────────────────────────

/// Rows returned by the remote service, in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<Vec<Row>> for ResultSet {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
