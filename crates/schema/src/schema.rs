//! Schema-form table types
//!
//! The schema form identifies columns and indexes by name; descriptors
//! (see [`crate::descriptor`]) replace the names with numeric IDs.

use serde::{Deserialize, Serialize};

pub type ColumnId = u32;
pub type IndexId = u32;

/// The data type of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    #[default]
    Bytes,
    Int,
    Float,
    Bool,
    String,
}

/// A table column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Lowercase, non-empty, no `/`.
    pub name: String,
    pub column_type: ColumnType,
    /// Reserved for future use.
    #[serde(default)]
    pub flags: u32,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            column_type,
            flags: 0,
        }
    }
}

/// An index over one or more columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Lowercase, non-empty, no `/`.
    pub name: String,
    pub unique: bool,
}

/// An index in schema form, naming its columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexByName {
    pub index: Index,
    pub column_names: Vec<String>,
}

/// A human-authored table description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<IndexByName>,
}
