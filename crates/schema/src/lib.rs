//! Table schemas and descriptors
//!
//! A [`TableSchema`] is the human-authored form of a table: columns and
//! indexes identified by name. A [`TableDescriptor`] is its machine
//! form, where every column and index carries a stable numeric ID
//! allocated from monotonic counters. The two convert losslessly in both
//! directions for well-formed input, and [`TableDescriptor::validate`]
//! enforces the structural invariants.

mod descriptor;
mod error;
mod schema;
mod validate;

pub use descriptor::{ColumnDescriptor, IndexDescriptor, TableDescriptor};
pub use error::{Error, Result};
pub use schema::{Column, ColumnId, ColumnType, Index, IndexByName, IndexId, TableSchema};
