//! Row and cell key construction
//!
//! A row's prefix is the order-preserving encoding of the table name
//! followed by each primary-key column value in declared order; the key
//! of a single cell is that prefix with the raw column name appended.
//! Because the prefix uses the order-preserving codec, rows sort by
//! primary key and all cells of one row sort contiguously.

use strata_encoding as encoding;
use strata_kv::Key;

use crate::datum::{Datum, DatumKind};
use crate::error::{Error, Result};
use crate::model::Model;
use crate::record::Record;

/// Encode the row prefix for `record` under `model`.
pub(crate) fn row_prefix(model: &Model, record: &dyn Record) -> Result<Key> {
    let mut key = Vec::new();
    encoding::encode_bytes(&mut key, model.name.as_bytes());

    for column in &model.primary_key {
        let datum = record.datum(column).ok_or_else(|| Error::UnknownColumn {
            table: model.name.clone(),
            column: column.clone(),
        })?;
        encode_key_datum(&mut key, column, datum)?;
    }

    Ok(key)
}

/// Decode a row prefix from the front of `key` into `record`'s
/// primary-key fields, returning the remaining (column-name) bytes.
pub(crate) fn decode_row_prefix<'k>(
    model: &Model,
    key: &'k [u8],
    record: &mut dyn Record,
) -> Result<&'k [u8]> {
    let (mut rest, table) = encoding::decode_string(key)?;
    if table != model.name {
        return Err(Error::UnexpectedTable {
            table: model.name.clone(),
            found: table,
        });
    }

    for column in &model.primary_key {
        let kind = *model.fields.get(column).ok_or_else(|| Error::UnknownColumn {
            table: model.name.clone(),
            column: column.clone(),
        })?;
        let (remaining, datum) = decode_key_datum(rest, kind)?;
        record.set_datum(column, datum)?;
        rest = remaining;
    }

    Ok(rest)
}

/// The key of one cell: row prefix plus raw column name.
pub(crate) fn cell_key(prefix: &[u8], column: &str) -> Key {
    let mut key = Vec::with_capacity(prefix.len() + column.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(column.as_bytes());
    key
}

fn encode_key_datum(buf: &mut Vec<u8>, column: &str, datum: Datum) -> Result<()> {
    match datum {
        Datum::Null => {
            return Err(Error::NullPrimaryKey {
                column: column.to_string(),
            });
        }
        Datum::Bool(v) => encoding::encode_bool(buf, v),
        Datum::Int(v) => encoding::encode_varint(buf, v),
        Datum::UInt(v) => encoding::encode_uvarint(buf, v),
        Datum::Float(v) => encoding::encode_float(buf, v)?,
        Datum::String(v) => encoding::encode_string(buf, &v),
        Datum::Bytes(v) => encoding::encode_bytes(buf, &v),
    }
    Ok(())
}

fn decode_key_datum(input: &[u8], kind: DatumKind) -> Result<(&[u8], Datum)> {
    Ok(match kind {
        DatumKind::Bool => {
            let (rest, v) = encoding::decode_bool(input)?;
            (rest, Datum::Bool(v))
        }
        DatumKind::Int => {
            let (rest, v) = encoding::decode_varint(input)?;
            (rest, Datum::Int(v))
        }
        DatumKind::UInt => {
            let (rest, v) = encoding::decode_uvarint(input)?;
            (rest, Datum::UInt(v))
        }
        DatumKind::Float => {
            let (rest, v) = encoding::decode_float(input)?;
            (rest, Datum::Float(v))
        }
        DatumKind::String => {
            let (rest, v) = encoding::decode_string(input)?;
            (rest, Datum::String(v))
        }
        DatumKind::Bytes => {
            let (rest, v) = encoding::decode_bytes(input)?;
            (rest, Datum::Bytes(v))
        }
    })
}
