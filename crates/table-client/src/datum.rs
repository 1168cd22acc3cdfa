//! Field values and their KV value representation
//!
//! A [`Datum`] is the owned form of a single record field as it crosses
//! the client boundary. Marshalling maps a datum onto the KV [`Value`]
//! payloads: booleans, integers and floats travel as the integer
//! payload (floats as their bit pattern), strings and raw bytes as the
//! byte payload, and `Null` as a value with neither.

use strata_kv::Value;

use crate::error::{Error, Result};

/// The kind of a record field, declared once per bound column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatumKind {
    Bool,
    Int,
    UInt,
    Float,
    String,
    Bytes,
}

impl DatumKind {
    pub fn name(self) -> &'static str {
        match self {
            DatumKind::Bool => "bool",
            DatumKind::Int => "int",
            DatumKind::UInt => "uint",
            DatumKind::Float => "float",
            DatumKind::String => "string",
            DatumKind::Bytes => "bytes",
        }
    }
}

/// A single field value in transit between a record and the store.
///
/// `Null` stands for an absent value; unmarshalling it into a concrete
/// field yields that field's zero value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Datum {
    pub fn kind(&self) -> Option<DatumKind> {
        match self {
            Datum::Null => None,
            Datum::Bool(_) => Some(DatumKind::Bool),
            Datum::Int(_) => Some(DatumKind::Int),
            Datum::UInt(_) => Some(DatumKind::UInt),
            Datum::Float(_) => Some(DatumKind::Float),
            Datum::String(_) => Some(DatumKind::String),
            Datum::Bytes(_) => Some(DatumKind::Bytes),
        }
    }

    fn type_name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.name(),
            None => "null",
        }
    }

    /// Extract a bool, treating `Null` as the zero value.
    pub fn into_bool(self) -> Result<bool> {
        match self {
            Datum::Bool(v) => Ok(v),
            Datum::Null => Ok(false),
            other => Err(mismatch("bool", &other)),
        }
    }

    pub fn into_i64(self) -> Result<i64> {
        match self {
            Datum::Int(v) => Ok(v),
            Datum::Null => Ok(0),
            other => Err(mismatch("int", &other)),
        }
    }

    pub fn into_u64(self) -> Result<u64> {
        match self {
            Datum::UInt(v) => Ok(v),
            Datum::Null => Ok(0),
            other => Err(mismatch("uint", &other)),
        }
    }

    pub fn into_f64(self) -> Result<f64> {
        match self {
            Datum::Float(v) => Ok(v),
            Datum::Null => Ok(0.0),
            other => Err(mismatch("float", &other)),
        }
    }

    pub fn into_string(self) -> Result<String> {
        match self {
            Datum::String(v) => Ok(v),
            Datum::Null => Ok(String::new()),
            other => Err(mismatch("string", &other)),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Datum::Bytes(v) => Ok(v),
            Datum::Null => Ok(Vec::new()),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

fn mismatch(expected: &'static str, found: &Datum) -> Error {
    Error::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

/// Map a datum onto its KV value representation.
pub fn marshal_datum(datum: &Datum) -> Value {
    match datum {
        Datum::Null => Value::empty(),
        Datum::Bool(b) => Value::integer(i64::from(*b)),
        Datum::Int(i) => Value::integer(*i),
        Datum::UInt(u) => Value::integer(*u as i64),
        Datum::Float(f) => Value::integer(f.to_bits() as i64),
        Datum::String(s) => Value::bytes(s.as_bytes().to_vec()),
        Datum::Bytes(b) => Value::bytes(b.clone()),
    }
}

/// Recover a datum of the given kind from a KV value. `None` and
/// payload-less values unmarshal to `Null`; a payload of the wrong kind
/// is a type mismatch.
pub fn unmarshal_datum(value: Option<&Value>, kind: DatumKind) -> Result<Datum> {
    let Some(value) = value else {
        return Ok(Datum::Null);
    };

    match kind {
        DatumKind::Bool | DatumKind::Int | DatumKind::UInt | DatumKind::Float => {
            if value.bytes.is_some() {
                return Err(Error::TypeMismatch {
                    expected: kind.name(),
                    found: "bytes",
                });
            }
            Ok(match (kind, value.integer) {
                (_, None) => Datum::Null,
                (DatumKind::Bool, Some(i)) => Datum::Bool(i != 0),
                (DatumKind::Int, Some(i)) => Datum::Int(i),
                (DatumKind::UInt, Some(i)) => Datum::UInt(i as u64),
                (DatumKind::Float, Some(i)) => Datum::Float(f64::from_bits(i as u64)),
                _ => unreachable!("non-integer kind in integer arm"),
            })
        }
        DatumKind::String | DatumKind::Bytes => {
            if value.integer.is_some() {
                return Err(Error::TypeMismatch {
                    expected: kind.name(),
                    found: "integer",
                });
            }
            match (kind, &value.bytes) {
                (_, None) => Ok(Datum::Null),
                (DatumKind::String, Some(raw)) => {
                    let s = String::from_utf8(raw.clone())
                        .map_err(|_| Error::Codec(strata_encoding::Error::InvalidUtf8))?;
                    Ok(Datum::String(s))
                }
                (DatumKind::Bytes, Some(raw)) => Ok(Datum::Bytes(raw.clone())),
                _ => unreachable!("non-byte kind in byte arm"),
            }
        }
    }
}
