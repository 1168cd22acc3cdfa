//! Model registry
//!
//! A model is the immutable association between a record type and a
//! table: the table name, the column-to-kind map, the primary-key
//! column list and the remaining columns. Bindings are installed once
//! per type, shared read-only across batches, and never removed.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::datum::DatumKind;
use crate::error::{Error, Result};
use crate::record::Record;

/// The binding of a record type to a table.
#[derive(Debug)]
pub(crate) struct Model {
    /// Table name, lowercased.
    pub name: String,
    /// Lowercase column name to field kind.
    pub fields: HashMap<String, DatumKind>,
    /// All bound columns, in declaration order.
    pub columns: Vec<String>,
    /// Primary-key columns, in the order given at bind time.
    pub primary_key: Vec<String>,
    /// Every bound column not in the primary key, in declaration order.
    pub other_columns: Vec<String>,
}

/// Registry of installed bindings, keyed by record type. Writes take
/// the lock exclusively; per-operation lookups share it.
#[derive(Default)]
pub(crate) struct ModelRegistry {
    models: RwLock<HashMap<TypeId, Arc<Model>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a binding from `T` to `table`. Fails if `T` is already
    /// bound or a primary-key column is not among `T`'s fields.
    pub fn bind<T: Record>(&self, table: &str, primary_key: &[&str]) -> Result<()> {
        let mut models = self.models.write();
        if models.contains_key(&TypeId::of::<T>()) {
            return Err(Error::AlreadyBound {
                table: table.to_string(),
                type_name: std::any::type_name::<T>(),
            });
        }

        let name = table.to_lowercase();
        let mut fields = HashMap::new();
        let mut columns = Vec::new();
        for field in T::fields() {
            let column = field.name.to_lowercase();
            fields.insert(column.clone(), field.kind);
            columns.push(column);
        }

        let mut pk_columns = Vec::with_capacity(primary_key.len());
        for column in primary_key {
            let column = column.to_lowercase();
            if !fields.contains_key(&column) {
                return Err(Error::UnknownColumn {
                    table: name,
                    column,
                });
            }
            pk_columns.push(column);
        }

        let other_columns = columns
            .iter()
            .filter(|c| !pk_columns.contains(*c))
            .cloned()
            .collect();

        models.insert(
            TypeId::of::<T>(),
            Arc::new(Model {
                name,
                fields,
                columns,
                primary_key: pk_columns,
                other_columns,
            }),
        );
        Ok(())
    }

    /// Look up the binding for `T`.
    pub fn get<T: Record>(&self) -> Result<Arc<Model>> {
        self.models
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or(Error::NotBound {
                type_name: std::any::type_name::<T>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Datum;
    use crate::record::Field;

    #[derive(Default)]
    struct User {
        id: String,
        name: String,
        title: String,
    }

    impl Record for User {
        fn fields() -> &'static [Field] {
            const FIELDS: &[Field] = &[
                Field::new("id", DatumKind::String),
                Field::new("name", DatumKind::String),
                Field::new("title", DatumKind::String),
            ];
            FIELDS
        }

        fn datum(&self, column: &str) -> Option<Datum> {
            match column {
                "id" => Some(Datum::String(self.id.clone())),
                "name" => Some(Datum::String(self.name.clone())),
                "title" => Some(Datum::String(self.title.clone())),
                _ => None,
            }
        }

        fn set_datum(&mut self, column: &str, datum: Datum) -> Result<()> {
            match column {
                "id" => self.id = datum.into_string()?,
                "name" => self.name = datum.into_string()?,
                "title" => self.title = datum.into_string()?,
                _ => {
                    return Err(Error::UnknownColumn {
                        table: "users".to_string(),
                        column: column.to_string(),
                    });
                }
            }
            Ok(())
        }
    }

    #[test]
    fn bind_and_lookup() {
        let registry = ModelRegistry::new();
        registry.bind::<User>("Users", &["id"]).unwrap();

        let model = registry.get::<User>().unwrap();
        assert_eq!(model.name, "users");
        assert_eq!(model.primary_key, vec!["id"]);
        assert_eq!(model.columns, vec!["id", "name", "title"]);
        assert_eq!(model.other_columns, vec!["name", "title"]);
        assert_eq!(model.fields.len(), 3);
    }

    #[test]
    fn rebinding_fails() {
        let registry = ModelRegistry::new();
        registry.bind::<User>("users", &["id"]).unwrap();
        assert!(matches!(
            registry.bind::<User>("users2", &["id"]),
            Err(Error::AlreadyBound { .. })
        ));
    }

    #[test]
    fn unknown_primary_key_column_fails() {
        let registry = ModelRegistry::new();
        let err = registry.bind::<User>("users", &["missing"]).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { .. }));
        // The failed bind must not leave a partial installation behind.
        assert!(matches!(
            registry.get::<User>(),
            Err(Error::NotBound { .. })
        ));
    }

    #[test]
    fn unbound_type_fails() {
        #[derive(Default)]
        struct Other;
        impl Record for Other {
            fn fields() -> &'static [Field] {
                &[]
            }
            fn datum(&self, _column: &str) -> Option<Datum> {
                None
            }
            fn set_datum(&mut self, column: &str, _datum: Datum) -> Result<()> {
                Err(Error::UnknownColumn {
                    table: String::new(),
                    column: column.to_string(),
                })
            }
        }

        let registry = ModelRegistry::new();
        assert!(matches!(
            registry.get::<Other>(),
            Err(Error::NotBound { .. })
        ));
    }
}
