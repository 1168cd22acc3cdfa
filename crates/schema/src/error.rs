//! Schema validation errors
//!
//! The display strings are part of the external contract and are
//! asserted verbatim by the validator tests.

use thiserror::Error;

use crate::schema::{ColumnId, IndexId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("empty {kind} name")]
    EmptyName { kind: &'static str },

    #[error("\"{name}\" may not contain \"/\"")]
    NameContainsSlash { name: String },

    #[error("table must contain at least 1 column")]
    NoColumns,

    #[error("duplicate column name: \"{name}\"")]
    DuplicateColumnName { name: String },

    #[error("column \"{name}\" duplicate ID: {id}")]
    DuplicateColumnId { name: String, id: ColumnId },

    #[error("column \"{name}\" invalid ID ({id}) > next column ID ({next})")]
    ColumnIdOutOfRange {
        name: String,
        id: ColumnId,
        next: ColumnId,
    },

    #[error("table must contain at least 1 index")]
    NoIndexes,

    #[error("duplicate index name: \"{name}\"")]
    DuplicateIndexName { name: String },

    #[error("index \"{name}\" duplicate ID: {id}")]
    DuplicateIndexId { name: String, id: IndexId },

    #[error("index \"{name}\" invalid index ID ({id}) > next index ID ({next})")]
    IndexIdOutOfRange {
        name: String,
        id: IndexId,
        next: IndexId,
    },

    #[error("index \"{name}\" must contain at least 1 column")]
    EmptyIndex { name: String },

    #[error("index \"{name}\" contains unknown column ID {id}")]
    UnknownIndexColumn { name: String, id: ColumnId },
}
