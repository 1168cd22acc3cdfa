//! Core in-memory engine implementation

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::Mutex;

use strata_kv::types::{Key, KvOperation, KvResponse, ScannedRow, Value};
use strata_kv::{KvTransport, Result};

/// In-memory byte-ordered store implementing the KV contract.
///
/// Batches are applied atomically with respect to each other; operations
/// within a batch execute in submission order.
#[derive(Default)]
pub struct MemoryEngine {
    cells: Mutex<BTreeMap<Key, Value>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cells, for test assertions.
    pub fn len(&self) -> usize {
        self.cells.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.lock().is_empty()
    }

    fn apply(cells: &mut BTreeMap<Key, Value>, operation: KvOperation) -> KvResponse {
        match operation {
            KvOperation::Get { key } => KvResponse::GetResult {
                value: cells.get(&key).cloned(),
            },
            KvOperation::Put { key, value } => {
                if let Err(e) = value.verify_checksum(&key) {
                    return KvResponse::Error(e.to_string());
                }
                cells.insert(key, value);
                KvResponse::PutResult
            }
            KvOperation::Increment { key, delta } => {
                let base = match cells.get(&key) {
                    Some(existing) if existing.bytes.is_some() => {
                        return KvResponse::Error(format!(
                            "cannot increment non-integer value at key {key:02x?}"
                        ));
                    }
                    Some(existing) => existing.integer.unwrap_or(0),
                    None => 0,
                };
                let Some(new_value) = base.checked_add(delta) else {
                    return KvResponse::Error(format!(
                        "increment overflows at key {key:02x?}"
                    ));
                };
                let mut value = Value::integer(new_value);
                value.init_checksum(&key);
                cells.insert(key, value);
                KvResponse::IncrementResult { new_value }
            }
            KvOperation::Scan {
                start,
                end,
                max_rows,
            } => {
                let range = (Bound::Included(start), Bound::Excluded(end));
                let mut rows = Vec::new();
                for (key, value) in cells.range::<Key, _>(range) {
                    if max_rows > 0 && rows.len() as i64 >= max_rows {
                        break;
                    }
                    rows.push(ScannedRow {
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
                KvResponse::ScanResult { rows }
            }
            KvOperation::Delete { key } => {
                cells.remove(&key);
                KvResponse::DeleteResult
            }
        }
    }
}

#[async_trait]
impl KvTransport for MemoryEngine {
    async fn submit(&self, operations: Vec<KvOperation>) -> Result<Vec<KvResponse>> {
        let mut cells = self.cells.lock();
        tracing::debug!(operations = operations.len(), "submit batch");
        Ok(operations
            .into_iter()
            .map(|op| Self::apply(&mut cells, op))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn submit_one(engine: &MemoryEngine, op: KvOperation) -> KvResponse {
        let mut replies = engine.submit(vec![op]).await.unwrap();
        assert_eq!(replies.len(), 1);
        replies.pop().unwrap()
    }

    #[tokio::test]
    async fn get_put_delete() {
        let engine = MemoryEngine::new();

        let missing = submit_one(
            &engine,
            KvOperation::Get {
                key: b"k".to_vec(),
            },
        )
        .await;
        assert_eq!(missing, KvResponse::GetResult { value: None });

        let put = submit_one(
            &engine,
            KvOperation::Put {
                key: b"k".to_vec(),
                value: Value::bytes(b"v".to_vec()),
            },
        )
        .await;
        assert_eq!(put, KvResponse::PutResult);

        let got = submit_one(
            &engine,
            KvOperation::Get {
                key: b"k".to_vec(),
            },
        )
        .await;
        assert_eq!(
            got,
            KvResponse::GetResult {
                value: Some(Value::bytes(b"v".to_vec()))
            }
        );

        let deleted = submit_one(
            &engine,
            KvOperation::Delete {
                key: b"k".to_vec(),
            },
        )
        .await;
        assert_eq!(deleted, KvResponse::DeleteResult);
        assert!(engine.is_empty());
    }

    #[tokio::test]
    async fn increment_accumulates_from_missing() {
        let engine = MemoryEngine::new();
        let first = submit_one(
            &engine,
            KvOperation::Increment {
                key: b"n".to_vec(),
                delta: 5,
            },
        )
        .await;
        assert_eq!(first, KvResponse::IncrementResult { new_value: 5 });

        let second = submit_one(
            &engine,
            KvOperation::Increment {
                key: b"n".to_vec(),
                delta: 3,
            },
        )
        .await;
        assert_eq!(second, KvResponse::IncrementResult { new_value: 8 });
    }

    #[tokio::test]
    async fn increment_rejects_byte_values() {
        let engine = MemoryEngine::new();
        submit_one(
            &engine,
            KvOperation::Put {
                key: b"s".to_vec(),
                value: Value::bytes(b"text".to_vec()),
            },
        )
        .await;
        let reply = submit_one(
            &engine,
            KvOperation::Increment {
                key: b"s".to_vec(),
                delta: 1,
            },
        )
        .await;
        assert!(matches!(reply, KvResponse::Error(_)));
    }

    #[tokio::test]
    async fn scan_returns_sorted_half_open_range() {
        let engine = MemoryEngine::new();
        for key in [b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec()] {
            submit_one(
                &engine,
                KvOperation::Put {
                    key: key.clone(),
                    value: Value::bytes(key.clone()),
                },
            )
            .await;
        }

        let reply = submit_one(
            &engine,
            KvOperation::Scan {
                start: b"b".to_vec(),
                end: b"d".to_vec(),
                max_rows: 0,
            },
        )
        .await;
        let KvResponse::ScanResult { rows } = reply else {
            panic!("expected scan result");
        };
        let keys: Vec<_> = rows.iter().map(|r| r.key.clone()).collect();
        assert_eq!(keys, vec![b"b".to_vec(), b"c".to_vec()]);
    }

    #[tokio::test]
    async fn scan_honors_max_rows() {
        let engine = MemoryEngine::new();
        for key in [b"a".to_vec(), b"b".to_vec(), b"c".to_vec()] {
            submit_one(
                &engine,
                KvOperation::Put {
                    key,
                    value: Value::integer(1),
                },
            )
            .await;
        }
        let reply = submit_one(
            &engine,
            KvOperation::Scan {
                start: b"a".to_vec(),
                end: b"z".to_vec(),
                max_rows: 2,
            },
        )
        .await;
        let KvResponse::ScanResult { rows } = reply else {
            panic!("expected scan result");
        };
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn failed_operation_does_not_abort_batch() {
        let engine = MemoryEngine::new();
        let replies = engine
            .submit(vec![
                KvOperation::Put {
                    key: b"s".to_vec(),
                    value: Value::bytes(b"text".to_vec()),
                },
                KvOperation::Increment {
                    key: b"s".to_vec(),
                    delta: 1,
                },
                KvOperation::Put {
                    key: b"t".to_vec(),
                    value: Value::integer(9),
                },
            ])
            .await
            .unwrap();
        assert_eq!(replies[0], KvResponse::PutResult);
        assert!(matches!(replies[1], KvResponse::Error(_)));
        assert_eq!(replies[2], KvResponse::PutResult);
        assert_eq!(engine.len(), 2);
    }

    #[tokio::test]
    async fn put_rejects_corrupt_checksum() {
        let engine = MemoryEngine::new();
        let mut value = Value::integer(7);
        value.init_checksum(b"right-key");
        let reply = submit_one(
            &engine,
            KvOperation::Put {
                key: b"wrong-key".to_vec(),
                value,
            },
        )
        .await;
        assert!(matches!(reply, KvResponse::Error(_)));
    }
}
