//! KV response types

use serde::{Deserialize, Serialize};

use crate::types::{Key, Value};

/// One key-value pair returned by a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedRow {
    pub key: Key,
    pub value: Value,
}

/// The store's answer to a single [`KvOperation`](crate::KvOperation).
///
/// A failed operation answers with `Error` in its slot; later operations
/// in the same batch still execute and report independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KvResponse {
    GetResult { value: Option<Value> },
    PutResult,
    IncrementResult { new_value: i64 },
    ScanResult { rows: Vec<ScannedRow> },
    DeleteResult,
    Error(String),
}
