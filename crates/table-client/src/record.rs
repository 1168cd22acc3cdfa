//! Record types bound to tables
//!
//! A [`Record`] exposes its stored columns through a small visitor
//! surface: static field metadata plus per-column get and set. The
//! client never reflects over the concrete type; everything it needs is
//! reachable through these three methods, which keeps the trait object
//! safe for batch entries that erase the record type.

use crate::datum::{Datum, DatumKind};
use crate::error::Result;

/// Metadata for one stored column of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Lowercase column name.
    pub name: &'static str,
    pub kind: DatumKind,
}

impl Field {
    pub const fn new(name: &'static str, kind: DatumKind) -> Self {
        Field { name, kind }
    }
}

/// A native type whose instances map onto table rows.
///
/// Implementations list every stored column in `fields` and route
/// column names to the matching struct fields in `datum`/`set_datum`.
/// `datum` returns `None` for a column the type does not carry;
/// `set_datum` fails with a type mismatch when the datum kind does not
/// match the field.
pub trait Record: Send + 'static {
    /// Column metadata, in declaration order.
    fn fields() -> &'static [Field]
    where
        Self: Sized;

    /// Read the named column out of the record.
    fn datum(&self, column: &str) -> Option<Datum>;

    /// Write the named column into the record.
    fn set_datum(&mut self, column: &str, datum: Datum) -> Result<()>;
}

/// A growable destination for scanned rows, type-erased for batch
/// entries. Implemented for `Vec<T>`.
pub trait RowSink: Send {
    /// Append a zero-valued record.
    fn append_default(&mut self);

    /// The most recently appended record.
    fn last_record(&mut self) -> Option<&mut dyn Record>;
}

/// Marks a sink whose element type is known, tying scan destinations to
/// the scanned record type at compile time.
pub trait ScanDest: RowSink {
    type Elem: Record;
}

impl<T: Record + Default> RowSink for Vec<T> {
    fn append_default(&mut self) {
        self.push(T::default());
    }

    fn last_record(&mut self) -> Option<&mut dyn Record> {
        self.last_mut().map(|r| r as &mut dyn Record)
    }
}

impl<T: Record + Default> ScanDest for Vec<T> {
    type Elem = T;
}
