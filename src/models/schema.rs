//! Inferred relational schema

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::column::DataType;

/// Primary key chosen for a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "column", rename_all = "camelCase")]
pub enum PrimaryKey {
    /// An existing identifier column with all-distinct values
    Natural(String),
    /// A synthesized auto-incrementing integer column
    Surrogate(String),
}

impl PrimaryKey {
    pub fn column(&self) -> &str {
        match self {
            PrimaryKey::Natural(name) | PrimaryKey::Surrogate(name) => name,
        }
    }

    pub fn is_surrogate(&self) -> bool {
        matches!(self, PrimaryKey::Surrogate(_))
    }
}

/// Column-level constraint emitted in DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnConstraint::PrimaryKey => write!(f, "PRIMARY KEY"),
            ColumnConstraint::NotNull => write!(f, "NOT NULL"),
        }
    }
}

/// Column as it will be declared in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaColumn {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub constraints: Vec<ColumnConstraint>,
}

impl SchemaColumn {
    pub fn is_primary_key(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::PrimaryKey)
    }

    pub fn is_not_null(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::NotNull)
    }
}

/// One table of the inferred schema; the primary key column comes first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<SchemaColumn>,
    pub primary_key: PrimaryKey,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&SchemaColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Table name to table schema, in block order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: IndexMap<String, TableSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: TableSchema) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
