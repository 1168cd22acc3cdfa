//! Descriptor validation
//!
//! Checks the structural invariants of a [`TableDescriptor`] and
//! reports the first violation found, in a fixed order: table name,
//! columns, then indexes.

use std::collections::HashSet;

use crate::descriptor::TableDescriptor;
use crate::error::{Error, Result};

fn validate_name(name: &str, kind: &'static str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::EmptyName { kind });
    }
    if name.contains('/') {
        return Err(Error::NameContainsSlash {
            name: name.to_string(),
        });
    }
    Ok(())
}

impl TableDescriptor {
    /// Validate that the descriptor is well formed: names are legal,
    /// column and index names and IDs are unique, every allocated ID is
    /// below its counter, and every index references at least one
    /// existing column.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name, "table")?;

        if self.columns.is_empty() {
            return Err(Error::NoColumns);
        }

        let mut columns_by_name = HashSet::new();
        let mut columns_by_id = HashSet::new();
        for column in &self.columns {
            let name = &column.column.name;
            validate_name(name, "column")?;

            if !columns_by_name.insert(name.clone()) {
                return Err(Error::DuplicateColumnName { name: name.clone() });
            }
            if !columns_by_id.insert(column.id) {
                return Err(Error::DuplicateColumnId {
                    name: name.clone(),
                    id: column.id,
                });
            }
            if column.id >= self.next_column_id {
                return Err(Error::ColumnIdOutOfRange {
                    name: name.clone(),
                    id: column.id,
                    next: self.next_column_id,
                });
            }
        }

        if self.indexes.is_empty() {
            return Err(Error::NoIndexes);
        }

        let mut indexes_by_name = HashSet::new();
        let mut indexes_by_id = HashSet::new();
        for index in &self.indexes {
            let name = &index.index.name;
            validate_name(name, "index")?;

            if !indexes_by_name.insert(name.clone()) {
                return Err(Error::DuplicateIndexName { name: name.clone() });
            }
            if !indexes_by_id.insert(index.id) {
                return Err(Error::DuplicateIndexId {
                    name: name.clone(),
                    id: index.id,
                });
            }
            if index.id >= self.next_index_id {
                return Err(Error::IndexIdOutOfRange {
                    name: name.clone(),
                    id: index.id,
                    next: self.next_index_id,
                });
            }

            if index.column_ids.is_empty() {
                return Err(Error::EmptyIndex { name: name.clone() });
            }
            for &column_id in &index.column_ids {
                if !columns_by_id.contains(&column_id) {
                    return Err(Error::UnknownIndexColumn {
                        name: name.clone(),
                        id: column_id,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::{ColumnDescriptor, IndexDescriptor, TableDescriptor};
    use crate::schema::{Column, ColumnType, Index};

    fn column(id: u32, name: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            id,
            column: Column::new(name, ColumnType::Bytes),
        }
    }

    fn index(id: u32, name: &str, column_ids: Vec<u32>) -> IndexDescriptor {
        IndexDescriptor {
            id,
            index: Index {
                name: name.to_string(),
                unique: false,
            },
            column_ids,
        }
    }

    #[test]
    fn first_violation_is_reported_verbatim() {
        let cases: Vec<(&str, TableDescriptor)> = vec![
            ("empty table name", TableDescriptor::default()),
            (
                "\"foo/bar\" may not contain \"/\"",
                TableDescriptor {
                    name: "foo/bar".to_string(),
                    ..Default::default()
                },
            ),
            (
                "table must contain at least 1 column",
                TableDescriptor {
                    name: "foo".to_string(),
                    ..Default::default()
                },
            ),
            (
                "empty column name",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "")],
                    next_column_id: 1,
                    ..Default::default()
                },
            ),
            (
                "table must contain at least 1 index",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar")],
                    next_column_id: 1,
                    ..Default::default()
                },
            ),
            (
                "duplicate column name: \"bar\"",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar"), column(0, "bar")],
                    next_column_id: 1,
                    ..Default::default()
                },
            ),
            (
                "column \"blah\" duplicate ID: 0",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar"), column(0, "blah")],
                    next_column_id: 1,
                    ..Default::default()
                },
            ),
            (
                "column \"bar\" invalid ID (2) > next column ID (1)",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(2, "bar")],
                    next_column_id: 1,
                    ..Default::default()
                },
            ),
            (
                "empty index name",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar")],
                    indexes: vec![index(0, "", vec![])],
                    next_column_id: 1,
                    next_index_id: 0,
                },
            ),
            (
                "index \"bar\" must contain at least 1 column",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar")],
                    indexes: vec![index(0, "bar", vec![])],
                    next_column_id: 1,
                    next_index_id: 1,
                },
            ),
            (
                "duplicate index name: \"bar\"",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar")],
                    indexes: vec![index(0, "bar", vec![0]), index(0, "bar", vec![0])],
                    next_column_id: 1,
                    next_index_id: 1,
                },
            ),
            (
                "index \"blah\" duplicate ID: 0",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar")],
                    indexes: vec![index(0, "bar", vec![0]), index(0, "blah", vec![0])],
                    next_column_id: 1,
                    next_index_id: 1,
                },
            ),
            (
                "index \"bar\" invalid index ID (3) > next index ID (1)",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar")],
                    indexes: vec![index(3, "bar", vec![0])],
                    next_column_id: 1,
                    next_index_id: 1,
                },
            ),
            (
                "index \"bar\" contains unknown column ID 1",
                TableDescriptor {
                    name: "foo".to_string(),
                    columns: vec![column(0, "bar")],
                    indexes: vec![index(0, "bar", vec![1])],
                    next_column_id: 1,
                    next_index_id: 1,
                },
            ),
        ];

        for (expected, desc) in cases {
            let err = desc
                .validate()
                .expect_err(&format!("expected \"{expected}\", found success"));
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn well_formed_descriptor_validates() {
        let desc = TableDescriptor {
            name: "foo".to_string(),
            columns: vec![column(0, "bar"), column(1, "blah")],
            indexes: vec![index(0, "bar", vec![0, 1])],
            next_column_id: 2,
            next_index_id: 1,
        };
        desc.validate().unwrap();
    }

    #[test]
    fn id_equal_to_counter_is_rejected() {
        let desc = TableDescriptor {
            name: "foo".to_string(),
            columns: vec![column(1, "bar")],
            next_column_id: 1,
            ..Default::default()
        };
        assert_eq!(
            desc.validate().unwrap_err().to_string(),
            "column \"bar\" invalid ID (1) > next column ID (1)"
        );
    }
}
