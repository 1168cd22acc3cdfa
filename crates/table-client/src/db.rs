//! Database client
//!
//! The [`Db`] handle owns the model registry and the transport. It
//! hands out batches, runs them, and offers one-shot wrappers that
//! build and execute a single-operation batch.

use std::sync::Arc;

use strata_kv::KvTransport;

use crate::batch::Batch;
use crate::error::Result;
use crate::model::ModelRegistry;
use crate::record::{Record, ScanDest};

/// Client handle for structured-table operations over a KV transport.
///
/// Cloning shares the transport and the installed bindings. Batches
/// built from different handles of the same client may run
/// concurrently; the registry is read-shared across them.
#[derive(Clone)]
pub struct Db {
    transport: Arc<dyn KvTransport>,
    models: Arc<ModelRegistry>,
}

impl Db {
    pub fn new(transport: Arc<dyn KvTransport>) -> Self {
        Db {
            transport,
            models: Arc::new(ModelRegistry::new()),
        }
    }

    /// Bind record type `T` to `table` with the given primary-key
    /// columns. Every type used in row operations must be bound first;
    /// binding the same type twice is an error.
    pub fn bind_model<T: Record>(&self, table: &str, primary_key: &[&str]) -> Result<()> {
        self.models.bind::<T>(table, primary_key)
    }

    /// Start an empty batch.
    pub fn batch<'a>(&self) -> Batch<'a> {
        Batch::new(self.models.clone())
    }

    /// Execute a batch: submit all pending calls in enqueue order, feed
    /// the replies back through each entry's decoder, and return one
    /// result per enqueued operation. An `Err` return means the
    /// submission itself failed and no entry executed.
    pub async fn run(&self, mut batch: Batch<'_>) -> Result<Vec<Result<()>>> {
        let (operations, counts) = batch.take_calls();
        let responses = if operations.is_empty() {
            Vec::new()
        } else {
            self.transport.submit(operations).await?
        };
        Ok(batch.apply_responses(counts, responses))
    }

    /// Read `columns` (all non-primary-key columns when empty) of the
    /// row addressed by `record`'s primary-key fields into `record`.
    pub async fn get<T: Record>(&self, record: &mut T, columns: &[&str]) -> Result<()> {
        let mut batch = self.batch();
        batch.get(record, columns);
        self.run_one(batch).await
    }

    /// Write `columns` (every bound column when empty) of `record`.
    pub async fn put<T: Record>(&self, record: &T, columns: &[&str]) -> Result<()> {
        let mut batch = self.batch();
        batch.put(record, columns);
        self.run_one(batch).await
    }

    /// Atomically add `delta` to the integer `column` of the row
    /// addressed by `record`, storing the new value back into `record`.
    pub async fn increment<T: Record>(
        &self,
        record: &mut T,
        delta: i64,
        column: &str,
    ) -> Result<()> {
        let mut batch = self.batch();
        batch.increment(record, delta, column);
        self.run_one(batch).await
    }

    /// Scan the rows in `[start, end)`, appending one record per row to
    /// `dest`. See [`Batch::scan`].
    pub async fn scan<T, D>(
        &self,
        dest: &mut D,
        start: &T,
        end: &T,
        max_rows: i64,
        columns: &[&str],
    ) -> Result<()>
    where
        T: Record,
        D: ScanDest<Elem = T>,
    {
        let mut batch = self.batch();
        batch.scan(dest, start, end, max_rows, columns);
        self.run_one(batch).await
    }

    /// Delete `columns` (every bound column when empty) of the row
    /// addressed by `record`'s primary-key fields.
    pub async fn delete<T: Record>(&self, record: &T, columns: &[&str]) -> Result<()> {
        let mut batch = self.batch();
        batch.delete(record, columns);
        self.run_one(batch).await
    }

    pub(crate) fn transport(&self) -> &Arc<dyn KvTransport> {
        &self.transport
    }

    async fn run_one(&self, batch: Batch<'_>) -> Result<()> {
        let mut results = self.run(batch).await?;
        match results.pop() {
            Some(result) => result,
            None => Ok(()),
        }
    }
}
