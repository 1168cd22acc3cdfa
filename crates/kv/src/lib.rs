//! Key-value wire contract
//!
//! This crate defines the narrow interface the table client consumes from
//! the underlying distributed key-value store: the cell [`Value`]
//! representation, the [`KvOperation`]/[`KvResponse`] pairs, and the
//! [`KvTransport`] batch-submission trait. The distributed transport
//! itself lives behind that trait.

mod error;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
pub use transport::KvTransport;
pub use types::{Key, KvOperation, KvResponse, OperationType, ScannedRow, Value};
