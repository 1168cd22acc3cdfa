//! Structured-table client
//!
//! Binds native record types to logical tables and translates row
//! operations (get / put / increment / scan / delete) into batches of
//! key-value commands against the [`strata_kv::KvTransport`] contract.
//! Row keys are built with the order-preserving codec so that range
//! scans return rows in primary-key order; cell values travel in the
//! KV [`Value`](strata_kv::Value) representation.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use strata_table_client::{Datum, DatumKind, Db, Field, Record, Result};
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn fields() -> &'static [Field] {
//!         const FIELDS: &[Field] = &[
//!             Field::new("id", DatumKind::String),
//!             Field::new("name", DatumKind::String),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn datum(&self, column: &str) -> Option<Datum> {
//!         match column {
//!             "id" => Some(Datum::String(self.id.clone())),
//!             "name" => Some(Datum::String(self.name.clone())),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_datum(&mut self, column: &str, datum: Datum) -> Result<()> {
//!         match column {
//!             "id" => self.id = datum.into_string()?,
//!             "name" => self.name = datum.into_string()?,
//!             _ => unreachable!(),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn example(transport: Arc<dyn strata_kv::KvTransport>) -> Result<()> {
//! let db = Db::new(transport);
//! db.bind_model::<User>("users", &["id"])?;
//! db.put(&User { id: "42".into(), name: "ada".into() }, &[]).await?;
//! # Ok(())
//! # }
//! ```

mod batch;
mod datum;
mod db;
mod error;
mod key;
mod model;
mod namespace;
mod record;

pub use batch::Batch;
pub use datum::{marshal_datum, unmarshal_datum, Datum, DatumKind};
pub use db::Db;
pub use error::{Error, Result};
pub use record::{Field, Record, RowSink, ScanDest};

pub use strata_kv::{KvTransport, Value};
pub use strata_schema::{Column, ColumnType, Index, IndexByName, TableDescriptor, TableSchema};
