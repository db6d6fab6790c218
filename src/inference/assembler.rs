//! Schema assembly from inferred columns and keys

use crate::models::{
    Column, ColumnConstraint, DataType, PrimaryKey, Schema, SchemaColumn, TableSchema,
};

/// Combines inferred columns and primary keys into a [`Schema`]
pub struct SchemaAssembler;

impl SchemaAssembler {
    /// Build the schema entry of one table.
    ///
    /// The primary key column is placed first. A surrogate key is a new
    /// integer column; a natural key keeps its inferred type. Every other
    /// column gets `NOT NULL` exactly when no value was missing.
    pub fn assemble_table(name: &str, columns: &[Column], primary_key: &PrimaryKey) -> TableSchema {
        let mut schema_columns = Vec::with_capacity(columns.len() + 1);

        let key_type = match primary_key {
            PrimaryKey::Surrogate(_) => DataType::Integer,
            PrimaryKey::Natural(key) => columns
                .iter()
                .find(|c| &c.name == key)
                .map(|c| c.data_type)
                .unwrap_or(DataType::Integer),
        };
        schema_columns.push(SchemaColumn {
            name: primary_key.column().to_string(),
            data_type: key_type,
            constraints: vec![ColumnConstraint::PrimaryKey],
        });

        for column in columns {
            if column.name == primary_key.column() {
                continue;
            }
            let constraints = if column.nullable {
                Vec::new()
            } else {
                vec![ColumnConstraint::NotNull]
            };
            schema_columns.push(SchemaColumn {
                name: column.name.clone(),
                data_type: column.data_type,
                constraints,
            });
        }

        TableSchema {
            name: name.to_string(),
            columns: schema_columns,
            primary_key: primary_key.clone(),
        }
    }

    /// Build a full schema, preserving the order of `tables`
    pub fn assemble<'a, I>(tables: I) -> Schema
    where
        I: IntoIterator<Item = (&'a str, &'a [Column], &'a PrimaryKey)>,
    {
        let mut schema = Schema::new();
        for (name, columns, primary_key) in tables {
            schema.insert(Self::assemble_table(name, columns, primary_key));
        }
        schema
    }
}
