//! Cell value representation
//!
//! A [`Value`] carries at most one of an integer payload and a byte
//! payload, plus an optional CRC-32 checksum computed over the cell key
//! and the payload.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The value stored under a single cell key.
///
/// Booleans, integers and floats travel as `integer` (floats as their
/// 64-bit pattern); strings and raw bytes travel as `bytes`. A value with
/// neither payload represents an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Integer payload, mutually exclusive with `bytes`.
    pub integer: Option<i64>,
    /// Byte payload, mutually exclusive with `integer`.
    pub bytes: Option<Vec<u8>>,
    /// CRC-32 over the cell key and payload, set by [`Value::init_checksum`].
    pub checksum: Option<u32>,
}

impl Value {
    /// A value with an integer payload.
    pub fn integer(v: i64) -> Self {
        Value {
            integer: Some(v),
            ..Default::default()
        }
    }

    /// A value with a byte payload.
    pub fn bytes(v: Vec<u8>) -> Self {
        Value {
            bytes: Some(v),
            ..Default::default()
        }
    }

    /// A value with neither payload.
    pub fn empty() -> Self {
        Value::default()
    }

    pub fn is_empty(&self) -> bool {
        self.integer.is_none() && self.bytes.is_none()
    }

    /// Compute and store the checksum over `key` and the payload. Does
    /// nothing if a checksum is already present.
    pub fn init_checksum(&mut self, key: &[u8]) {
        if self.checksum.is_none() {
            self.checksum = Some(self.compute_checksum(key));
        }
    }

    /// Verify a present checksum against `key`; values without a
    /// checksum pass.
    pub fn verify_checksum(&self, key: &[u8]) -> Result<()> {
        let Some(stored) = self.checksum else {
            return Ok(());
        };
        let computed = self.compute_checksum(key);
        if stored != computed {
            return Err(Error::ChecksumMismatch {
                key: key.to_vec(),
                stored,
                computed,
            });
        }
        Ok(())
    }

    fn compute_checksum(&self, key: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key);
        if let Some(i) = self.integer {
            hasher.update(&i.to_be_bytes());
        }
        if let Some(ref b) = self.bytes {
            hasher.update(b);
        }
        hasher.finalize()
    }
}
