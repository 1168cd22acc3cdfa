//! Row operations over a batch of KV calls
//!
//! Each high-level operation becomes one batch entry holding its
//! pending KV calls, a reply decoder, and a result slot. A setup
//! failure (unbound type, unknown column, key encoding) is recorded on
//! the entry without disturbing entries enqueued earlier; reply
//! decoding failures land in the same slot. Entries execute in enqueue
//! order within a single transport submission.

use std::collections::HashSet;
use std::sync::Arc;

use strata_kv::types::{Key, KvOperation, KvResponse, ScannedRow};

use crate::datum::{marshal_datum, unmarshal_datum, Datum, DatumKind};
use crate::error::{Error, Result};
use crate::key;
use crate::model::{Model, ModelRegistry};
use crate::record::{Record, RowSink, ScanDest};

/// An ordered collection of pending row operations sharing one
/// execution. The lifetime ties the batch to the caller records its
/// decoders will populate.
pub struct Batch<'a> {
    registry: Arc<ModelRegistry>,
    entries: Vec<Entry<'a>>,
}

struct Entry<'a> {
    calls: Vec<KvOperation>,
    decoder: Decoder<'a>,
    result: Result<()>,
}

/// What to do with an entry's replies.
enum Decoder<'a> {
    /// Nothing to decode (put, delete).
    Discard,
    /// One get reply per listed column, unmarshalled into the record.
    Fields {
        record: &'a mut dyn Record,
        columns: Vec<(String, DatumKind, Key)>,
    },
    /// A single increment reply written back into the record.
    Increment {
        record: &'a mut dyn Record,
        column: String,
        kind: DatumKind,
    },
    /// A single scan reply, grouped by row prefix and appended to the
    /// destination.
    Scan {
        dest: &'a mut dyn RowSink,
        model: Arc<Model>,
        columns: Option<HashSet<String>>,
    },
}

impl<'a> Batch<'a> {
    pub(crate) fn new(registry: Arc<ModelRegistry>) -> Self {
        Batch {
            registry,
            entries: Vec::new(),
        }
    }

    /// Number of enqueued operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enqueue a read of `columns` (all non-primary-key columns when
    /// empty) into `record`, addressed by its current primary-key
    /// fields.
    pub fn get<T: Record>(&mut self, record: &'a mut T, columns: &[&str]) {
        let (model, prefix) = match self.resolve::<T>(&*record) {
            Ok(v) => v,
            Err(e) => return self.push_failed(e),
        };

        let columns = named_or(columns, &model.other_columns);
        let mut calls = Vec::with_capacity(columns.len());
        let mut decode = Vec::with_capacity(columns.len());
        for column in columns {
            let Some(&kind) = model.fields.get(&column) else {
                return self.push_failed(unknown_column(&model, column));
            };
            let cell = key::cell_key(&prefix, &column);
            tracing::debug!(key = ?cell, "get");
            calls.push(KvOperation::Get { key: cell.clone() });
            decode.push((column, kind, cell));
        }

        self.entries.push(Entry {
            calls,
            decoder: Decoder::Fields {
                record,
                columns: decode,
            },
            result: Ok(()),
        });
    }

    /// Enqueue a write of `columns` (every bound column when empty)
    /// from `record`, one put per cell.
    pub fn put<T: Record>(&mut self, record: &T, columns: &[&str]) {
        let (model, prefix) = match self.resolve::<T>(record) {
            Ok(v) => v,
            Err(e) => return self.push_failed(e),
        };

        let columns = named_or(columns, &model.columns);
        let mut calls = Vec::with_capacity(columns.len());
        for column in columns {
            let Some(datum) = record.datum(&column) else {
                return self.push_failed(unknown_column(&model, column));
            };
            let cell = key::cell_key(&prefix, &column);
            let mut value = marshal_datum(&datum);
            value.init_checksum(&cell);
            tracing::debug!(key = ?cell, "put");
            calls.push(KvOperation::Put { key: cell, value });
        }

        self.entries.push(Entry {
            calls,
            decoder: Decoder::Discard,
            result: Ok(()),
        });
    }

    /// Enqueue an atomic add of `delta` to the integer-typed `column`,
    /// writing the new value back into `record`.
    pub fn increment<T: Record>(&mut self, record: &'a mut T, delta: i64, column: &str) {
        let (model, prefix) = match self.resolve::<T>(&*record) {
            Ok(v) => v,
            Err(e) => return self.push_failed(e),
        };

        let column = column.to_string();
        let Some(&kind) = model.fields.get(&column) else {
            return self.push_failed(unknown_column(&model, column));
        };
        if !matches!(kind, DatumKind::Int | DatumKind::UInt) {
            return self.push_failed(Error::TypeMismatch {
                expected: "integer",
                found: kind.name(),
            });
        }

        let cell = key::cell_key(&prefix, &column);
        tracing::debug!(key = ?cell, delta, "increment");
        self.entries.push(Entry {
            calls: vec![KvOperation::Increment { key: cell, delta }],
            decoder: Decoder::Increment {
                record,
                column,
                kind,
            },
            result: Ok(()),
        });
    }

    /// Enqueue a scan of the rows in `[start, end)`, appending one
    /// record per row to `dest`. `start` and `end` supply primary-key
    /// values only. An empty `columns` list populates every returned
    /// cell; otherwise only the named columns are populated, with the
    /// rest left at their zero values.
    pub fn scan<T, D>(
        &mut self,
        dest: &'a mut D,
        start: &T,
        end: &T,
        max_rows: i64,
        columns: &[&str],
    ) where
        T: Record,
        D: ScanDest<Elem = T>,
    {
        let model = match self.registry.get::<T>() {
            Ok(m) => m,
            Err(e) => return self.push_failed(e),
        };
        let start_key = match key::row_prefix(&model, start) {
            Ok(k) => k,
            Err(e) => return self.push_failed(e),
        };
        let end_key = match key::row_prefix(&model, end) {
            Ok(k) => k,
            Err(e) => return self.push_failed(e),
        };

        let columns: Option<HashSet<String>> = if columns.is_empty() {
            None
        } else {
            Some(columns.iter().map(|c| c.to_string()).collect())
        };

        tracing::debug!(start = ?start_key, end = ?end_key, max_rows, "scan");
        self.entries.push(Entry {
            calls: vec![KvOperation::Scan {
                start: start_key,
                end: end_key,
                max_rows,
            }],
            decoder: Decoder::Scan {
                dest,
                model,
                columns,
            },
            result: Ok(()),
        });
    }

    /// Enqueue deletion of `columns` (every bound column when empty)
    /// of the row addressed by `record`'s primary-key fields.
    pub fn delete<T: Record>(&mut self, record: &T, columns: &[&str]) {
        let (model, prefix) = match self.resolve::<T>(record) {
            Ok(v) => v,
            Err(e) => return self.push_failed(e),
        };

        let columns = named_or(columns, &model.columns);
        let mut calls = Vec::with_capacity(columns.len());
        for column in columns {
            if !model.fields.contains_key(&column) {
                return self.push_failed(unknown_column(&model, column));
            }
            let cell = key::cell_key(&prefix, &column);
            tracing::debug!(key = ?cell, "delete");
            calls.push(KvOperation::Delete { key: cell });
        }

        self.entries.push(Entry {
            calls,
            decoder: Decoder::Discard,
            result: Ok(()),
        });
    }

    fn resolve<T: Record>(&self, record: &dyn Record) -> Result<(Arc<Model>, Key)> {
        let model = self.registry.get::<T>()?;
        let prefix = key::row_prefix(&model, record)?;
        Ok((model, prefix))
    }

    fn push_failed(&mut self, error: Error) {
        self.entries.push(Entry {
            calls: Vec::new(),
            decoder: Decoder::Discard,
            result: Err(error),
        });
    }

    /// Drain the pending calls of every healthy entry, in enqueue
    /// order, remembering how many calls each entry contributed.
    pub(crate) fn take_calls(&mut self) -> (Vec<KvOperation>, Vec<Option<usize>>) {
        let mut operations = Vec::new();
        let mut counts = Vec::with_capacity(self.entries.len());
        for entry in &mut self.entries {
            if entry.result.is_err() {
                counts.push(None);
                continue;
            }
            counts.push(Some(entry.calls.len()));
            operations.append(&mut entry.calls);
        }
        (operations, counts)
    }

    /// Feed each entry its reply slice and collect per-entry results.
    pub(crate) fn apply_responses(
        mut self,
        counts: Vec<Option<usize>>,
        responses: Vec<KvResponse>,
    ) -> Vec<Result<()>> {
        let mut responses = responses.into_iter();
        let mut results = Vec::with_capacity(self.entries.len());
        for (entry, count) in self.entries.iter_mut().zip(counts) {
            let Some(count) = count else {
                results.push(std::mem::replace(&mut entry.result, Ok(())));
                continue;
            };
            let replies: Vec<KvResponse> = responses.by_ref().take(count).collect();
            if replies.len() != count {
                results.push(Err(Error::Kv(strata_kv::Error::UnexpectedResponse)));
                continue;
            }
            results.push(entry.decoder.apply(&replies));
        }
        results
    }
}

impl Decoder<'_> {
    fn apply(&mut self, replies: &[KvResponse]) -> Result<()> {
        match self {
            Decoder::Discard => {
                for reply in replies {
                    if let KvResponse::Error(message) = reply {
                        return Err(operation_error(message));
                    }
                }
                Ok(())
            }
            Decoder::Fields { record, columns } => {
                for ((column, kind, cell), reply) in columns.iter().zip(replies) {
                    match reply {
                        KvResponse::GetResult { value } => {
                            if let Some(value) = value {
                                value.verify_checksum(cell)?;
                            }
                            let datum = unmarshal_datum(value.as_ref(), *kind)?;
                            record.set_datum(column, datum)?;
                        }
                        KvResponse::Error(message) => return Err(operation_error(message)),
                        _ => return Err(Error::Kv(strata_kv::Error::UnexpectedResponse)),
                    }
                }
                Ok(())
            }
            Decoder::Increment {
                record,
                column,
                kind,
            } => match replies {
                [KvResponse::IncrementResult { new_value }] => {
                    let datum = match kind {
                        DatumKind::UInt => Datum::UInt(*new_value as u64),
                        _ => Datum::Int(*new_value),
                    };
                    record.set_datum(column, datum)
                }
                [KvResponse::Error(message)] => Err(operation_error(message)),
                _ => Err(Error::Kv(strata_kv::Error::UnexpectedResponse)),
            },
            Decoder::Scan {
                dest,
                model,
                columns,
            } => match replies {
                [KvResponse::ScanResult { rows }] => {
                    decode_scan(&mut **dest, model, columns.as_ref(), rows)
                }
                [KvResponse::Error(message)] => Err(operation_error(message)),
                _ => Err(Error::Kv(strata_kv::Error::UnexpectedResponse)),
            },
        }
    }
}

/// Walk scanned cells in key order, starting a fresh destination record
/// whenever the row prefix changes, decoding the primary key from the
/// prefix and unmarshalling requested cells into fields.
fn decode_scan(
    dest: &mut dyn RowSink,
    model: &Model,
    columns: Option<&HashSet<String>>,
    rows: &[ScannedRow],
) -> Result<()> {
    let mut current_prefix: Vec<u8> = Vec::new();
    for row in rows {
        let new_row = current_prefix.is_empty() || !row.key.starts_with(&current_prefix);
        if new_row {
            dest.append_default();
        }
        let record = dest
            .last_record()
            .expect("destination is non-empty after append");
        if new_row {
            let suffix = key::decode_row_prefix(model, &row.key, &mut *record)?;
            current_prefix = row.key[..row.key.len() - suffix.len()].to_vec();
        }

        let suffix = &row.key[current_prefix.len()..];
        let column = std::str::from_utf8(suffix)
            .map_err(|_| Error::Codec(strata_encoding::Error::InvalidUtf8))?;
        if columns.is_some_and(|set| !set.contains(column)) {
            continue;
        }
        let Some(&kind) = model.fields.get(column) else {
            return Err(unknown_column(model, column.to_string()));
        };
        row.value.verify_checksum(&row.key)?;
        let datum = unmarshal_datum(Some(&row.value), kind)?;
        record.set_datum(column, datum)?;
    }
    Ok(())
}

fn named_or(columns: &[&str], default: &[String]) -> Vec<String> {
    if columns.is_empty() {
        default.to_vec()
    } else {
        columns.iter().map(|c| c.to_string()).collect()
    }
}

fn unknown_column(model: &Model, column: String) -> Error {
    Error::UnknownColumn {
        table: model.name.clone(),
        column,
    }
}

fn operation_error(message: &str) -> Error {
    Error::Kv(strata_kv::Error::Operation(message.to_string()))
}
