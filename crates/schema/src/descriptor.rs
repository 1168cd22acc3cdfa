//! Descriptor-form table types and schema conversion
//!
//! Descriptors carry the stable numeric IDs used on disk. Conversion
//! from a schema lowercases every name and allocates IDs from the
//! monotonic counters; converting back restores the name form. Neither
//! conversion validates its input; call [`TableDescriptor::validate`]
//! on the result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::{Column, ColumnId, Index, IndexByName, IndexId, TableSchema};

/// A column plus its allocated ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: ColumnId,
    pub column: Column,
}

/// An index plus its allocated ID, naming its columns by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub id: IndexId,
    pub index: Index,
    pub column_ids: Vec<ColumnId>,
}

/// The machine form of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
    /// Upper bound (exclusive) on allocated column IDs.
    pub next_column_id: ColumnId,
    /// Upper bound (exclusive) on allocated index IDs.
    pub next_index_id: IndexId,
}

impl TableDescriptor {
    /// Build a descriptor from a schema, lowercasing names and
    /// allocating column and index IDs in declaration order.
    pub fn from_schema(schema: TableSchema) -> Self {
        let mut desc = TableDescriptor {
            name: schema.name.to_lowercase(),
            ..Default::default()
        };

        let mut columns_by_name = HashMap::new();
        for mut column in schema.columns {
            column.name = column.name.to_lowercase();
            columns_by_name.insert(column.name.clone(), desc.next_column_id);
            desc.columns.push(ColumnDescriptor {
                id: desc.next_column_id,
                column,
            });
            desc.next_column_id += 1;
        }

        for index in schema.indexes {
            let mut index_desc = IndexDescriptor {
                id: desc.next_index_id,
                index: index.index,
                column_ids: Vec::with_capacity(index.column_names.len()),
            };
            index_desc.index.name = index_desc.index.name.to_lowercase();

            for column_name in &index.column_names {
                let id = columns_by_name
                    .get(&column_name.to_lowercase())
                    .copied()
                    .unwrap_or_default();
                index_desc.column_ids.push(id);
            }

            desc.indexes.push(index_desc);
            desc.next_index_id += 1;
        }

        desc
    }

    /// Recover the schema form, translating index column IDs back into
    /// column names.
    pub fn to_schema(&self) -> TableSchema {
        let mut schema = TableSchema {
            name: self.name.clone(),
            ..Default::default()
        };

        let mut columns_by_id = HashMap::new();
        for column in &self.columns {
            schema.columns.push(column.column.clone());
            columns_by_id.insert(column.id, column.column.name.clone());
        }

        for index in &self.indexes {
            let column_names = index
                .column_ids
                .iter()
                .map(|id| columns_by_id.get(id).cloned().unwrap_or_default())
                .collect();
            schema.indexes.push(IndexByName {
                index: index.index.clone(),
                column_names,
            });
        }

        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn sample_schema() -> TableSchema {
        TableSchema {
            name: "foo".to_string(),
            columns: vec![
                Column::new("a", ColumnType::Int),
                Column::new("b", ColumnType::String),
                Column::new("c", ColumnType::Bytes),
            ],
            indexes: vec![
                IndexByName {
                    index: Index {
                        name: "a".to_string(),
                        unique: true,
                    },
                    column_names: vec!["a".to_string()],
                },
                IndexByName {
                    index: Index {
                        name: "b".to_string(),
                        unique: false,
                    },
                    column_names: vec!["a".to_string(), "b".to_string()],
                },
            ],
        }
    }

    #[test]
    fn schema_descriptor_roundtrip() {
        let schema = sample_schema();
        let desc = TableDescriptor::from_schema(schema.clone());
        assert_eq!(desc.to_schema(), schema);
        desc.validate().unwrap();
    }

    #[test]
    fn ids_allocated_in_declaration_order() {
        let desc = TableDescriptor::from_schema(sample_schema());
        assert_eq!(
            desc.columns.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(
            desc.indexes.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(desc.next_column_id, 3);
        assert_eq!(desc.next_index_id, 2);
        assert_eq!(desc.indexes[1].column_ids, vec![0, 1]);
    }

    #[test]
    fn names_are_lowercased() {
        let mut schema = sample_schema();
        schema.name = "Foo".to_string();
        schema.columns[0].name = "A".to_string();
        schema.indexes[0].index.name = "A".to_string();
        schema.indexes[0].column_names = vec!["A".to_string()];

        let desc = TableDescriptor::from_schema(schema);
        assert_eq!(desc.name, "foo");
        assert_eq!(desc.columns[0].column.name, "a");
        assert_eq!(desc.indexes[0].index.name, "a");
        assert_eq!(desc.indexes[0].column_ids, vec![0]);
    }
}
