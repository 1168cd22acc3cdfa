//! Error types for the KV contract

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The transport failed to deliver the batch at all.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store rejected a single operation.
    #[error("operation error: {0}")]
    Operation(String),

    #[error("checksum mismatch for key {key:02x?}: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        key: Vec<u8>,
        stored: u32,
        computed: u32,
    },

    #[error("unexpected response type")]
    UnexpectedResponse,
}
