//! Error types for the table client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{table}: model '{type_name}' already bound")]
    AlreadyBound {
        table: String,
        type_name: &'static str,
    },

    #[error("no model bound for '{type_name}'")]
    NotBound { type_name: &'static str },

    #[error("{table}: unable to find column {column}")]
    UnknownColumn { table: String, column: String },

    #[error("{table}: unexpected table name: {found}")]
    UnexpectedTable { table: String, found: String },

    #[error("primary key column \"{column}\" may not be null")]
    NullPrimaryKey { column: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("table \"{0}\" already exists")]
    TableExists(String),

    #[error("table \"{0}\" not found")]
    TableNotFound(String),

    #[error("table name \"{0}\" is reserved")]
    ReservedTableName(String),

    #[error(transparent)]
    Schema(#[from] strata_schema::Error),

    #[error(transparent)]
    Codec(#[from] strata_encoding::Error),

    #[error(transparent)]
    Kv(#[from] strata_kv::Error),

    #[error("descriptor encoding: {0}")]
    Descriptor(#[from] serde_json::Error),
}
