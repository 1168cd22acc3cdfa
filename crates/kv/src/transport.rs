//! Batch submission contract
//!
//! The table client talks to the store exclusively through this trait;
//! production backends dispatch the batch over the wire, while
//! `strata-engine` provides an in-process implementation for tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{KvOperation, KvResponse};

#[async_trait]
pub trait KvTransport: Send + Sync {
    /// Submit a batch of operations, returning one response per
    /// operation in submission order. Per-operation failures are
    /// reported in-band as [`KvResponse::Error`]; an `Err` return means
    /// the batch as a whole was not executed.
    async fn submit(&self, operations: Vec<KvOperation>) -> Result<Vec<KvResponse>>;
}
