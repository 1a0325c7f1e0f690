//! `database/table` path parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A remote table addressed as `database/table` (e.g. `alerts/status`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TablePath {
    database: String,
    table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("table path is not of the form database/table: {0:?}")]
    Format(String),
}

impl TablePath {
    /// Build a path from its two segments. Both must be non-empty and
    /// free of `/`.
    pub fn new(database: &str, table: &str) -> Result<Self, PathError> {
        let valid = |s: &str| !s.is_empty() && !s.contains('/');
        if !valid(database) || !valid(table) {
            return Err(PathError::Format(format!("{database}/{table}")));
        }
        Ok(Self {
            database: database.to_string(),
            table: table.to_string(),
        })
    }

    pub fn parse(path: &str) -> Result<Self, PathError> {
        let mut segments = path.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(database), Some(table), None) if !database.is_empty() && !table.is_empty() => {
                Ok(Self {
                    database: database.to_string(),
                    table: table.to_string(),
                })
            }
            _ => Err(PathError::Format(path.to_string())),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Key under which this table's schema is cached: `database.table`.
    pub fn cache_key(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.table)
    }
}

impl FromStr for TablePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TablePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TablePath> for String {
    fn from(path: TablePath) -> Self {
        path.to_string()
    }
}
