//! Table namespace
//!
//! Table descriptors are persisted through the same KV contract the
//! row operations use: each descriptor lives in a single cell of a
//! reserved table, keyed by the lowercased table name, with the
//! JSON-serialized descriptor as the byte payload. A range scan over
//! the reserved prefix enumerates all tables.

use strata_encoding as encoding;
use strata_kv::types::{Key, KvOperation, KvResponse, Value};
use strata_schema::{TableDescriptor, TableSchema};

use crate::db::Db;
use crate::error::{Error, Result};

/// Reserved table holding one descriptor cell per user table. The name
/// contains a `.` so no validated user table can collide with it, but
/// creation rejects it explicitly as well.
const NAMESPACE_TABLE: &str = "system.tables";

/// Cell suffix under which a descriptor is stored.
const DESCRIPTOR_COLUMN: &str = "descriptor";

impl Db {
    /// Register a new table: convert the schema to a descriptor,
    /// validate it, and persist it. Fails if a table with the same
    /// (lowercased) name already exists.
    pub async fn create_table(&self, schema: TableSchema) -> Result<()> {
        let desc = TableDescriptor::from_schema(schema);
        desc.validate()?;
        if desc.name == NAMESPACE_TABLE {
            return Err(Error::ReservedTableName(desc.name));
        }

        let key = descriptor_key(&desc.name);
        if self.read_descriptor(&key).await?.is_some() {
            return Err(Error::TableExists(desc.name));
        }

        let mut value = Value::bytes(serde_json::to_vec(&desc)?);
        value.init_checksum(&key);
        tracing::debug!(table = %desc.name, "create table");
        let replies = self
            .transport()
            .submit(vec![KvOperation::Put { key, value }])
            .await?;
        match replies.as_slice() {
            [KvResponse::PutResult] => Ok(()),
            [KvResponse::Error(message)] => {
                Err(Error::Kv(strata_kv::Error::Operation(message.clone())))
            }
            _ => Err(Error::Kv(strata_kv::Error::UnexpectedResponse)),
        }
    }

    /// Fetch a table's schema by name.
    pub async fn describe_table(&self, name: &str) -> Result<TableSchema> {
        let name = name.to_lowercase();
        let key = descriptor_key(&name);
        let Some(desc) = self.read_descriptor(&key).await? else {
            return Err(Error::TableNotFound(name));
        };
        Ok(desc.to_schema())
    }

    /// List the names of all registered tables, in name order.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let prefix = namespace_prefix();
        let end = prefix_successor(prefix.clone());
        let replies = self
            .transport()
            .submit(vec![KvOperation::Scan {
                start: prefix.clone(),
                end,
                max_rows: 0,
            }])
            .await?;

        let rows = match replies.as_slice() {
            [KvResponse::ScanResult { rows }] => rows.clone(),
            [KvResponse::Error(message)] => {
                return Err(Error::Kv(strata_kv::Error::Operation(message.clone())));
            }
            _ => return Err(Error::Kv(strata_kv::Error::UnexpectedResponse)),
        };

        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            let suffix = &row.key[prefix.len()..];
            let (_, name) = encoding::decode_string(suffix)?;
            names.push(name);
        }
        Ok(names)
    }

    async fn read_descriptor(&self, key: &Key) -> Result<Option<TableDescriptor>> {
        let replies = self
            .transport()
            .submit(vec![KvOperation::Get { key: key.clone() }])
            .await?;
        let value = match replies.as_slice() {
            [KvResponse::GetResult { value }] => value.clone(),
            [KvResponse::Error(message)] => {
                return Err(Error::Kv(strata_kv::Error::Operation(message.clone())));
            }
            _ => return Err(Error::Kv(strata_kv::Error::UnexpectedResponse)),
        };
        let Some(value) = value else {
            return Ok(None);
        };
        let raw = value.bytes.as_deref().ok_or(Error::TypeMismatch {
            expected: "bytes",
            found: "integer",
        })?;
        Ok(Some(serde_json::from_slice(raw)?))
    }
}

fn namespace_prefix() -> Key {
    let mut key = Vec::new();
    encoding::encode_bytes(&mut key, NAMESPACE_TABLE.as_bytes());
    key
}

fn descriptor_key(table: &str) -> Key {
    let mut key = namespace_prefix();
    encoding::encode_bytes(&mut key, table.as_bytes());
    key.extend_from_slice(DESCRIPTOR_COLUMN.as_bytes());
    key
}

/// Smallest key strictly greater than every key starting with `key`.
fn prefix_successor(mut key: Key) -> Key {
    while let Some(last) = key.last_mut() {
        if *last < u8::MAX {
            *last += 1;
            return key;
        }
        key.pop();
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_keys_group_under_the_namespace_prefix() {
        let prefix = namespace_prefix();
        let a = descriptor_key("accounts");
        let b = descriptor_key("users");
        assert!(a.starts_with(&prefix));
        assert!(b.starts_with(&prefix));
        assert!(a < b);
        assert!(b < prefix_successor(prefix));
    }

    #[test]
    fn prefix_successor_handles_trailing_max_bytes() {
        assert_eq!(prefix_successor(vec![1, 2, 0xFF]), vec![1, 3]);
        assert_eq!(prefix_successor(vec![0xFF, 0xFF]), Vec::<u8>::new());
        assert_eq!(prefix_successor(vec![7]), vec![8]);
    }
}
