//! SQL generation for inferred schemas.
//!
//! # Security
//!
//! All identifiers (table names, column names, constraint names) are quoted
//! and escaped. Internal quote characters are escaped by doubling them, so a
//! header like `Order"; DROP TABLE x` stays a plain identifier.

use crate::models::{Relationship, Schema, SchemaColumn, TableSchema};

/// Generates DuckDB DDL for a [`Schema`]
pub struct SqlExporter;

impl SqlExporter {
    /// `CREATE TABLE` statement for one table, primary key column first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use data_modeller::export::SqlExporter;
    /// use data_modeller::inference::SchemaAssembler;
    /// use data_modeller::models::{Column, DataType, PrimaryKey};
    ///
    /// let table = SchemaAssembler::assemble_table(
    ///     "Customers",
    ///     &[
    ///         Column::new("CustomerID".to_string(), DataType::Integer, false),
    ///         Column::new("Name".to_string(), DataType::Text, false),
    ///     ],
    ///     &PrimaryKey::Natural("CustomerID".to_string()),
    /// );
    ///
    /// assert_eq!(
    ///     SqlExporter::create_table(&table),
    ///     "CREATE TABLE \"Customers\" (\"CustomerID\" BIGINT PRIMARY KEY, \"Name\" VARCHAR NOT NULL)"
    /// );
    /// ```
    pub fn create_table(table: &TableSchema) -> String {
        let columns: Vec<String> = table.columns.iter().map(Self::column_definition).collect();
        format!(
            "CREATE TABLE {} ({})",
            Self::quote_identifier(&table.name),
            columns.join(", ")
        )
    }

    fn column_definition(column: &SchemaColumn) -> String {
        let mut def = format!(
            "{} {}",
            Self::quote_identifier(&column.name),
            column.data_type.native_type()
        );
        for constraint in &column.constraints {
            def.push(' ');
            def.push_str(&constraint.to_string());
        }
        def
    }

    pub fn drop_table(name: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", Self::quote_identifier(name))
    }

    /// Parameterized `INSERT` over the given columns
    pub fn insert(table: &str, columns: &[&str]) -> String {
        let names: Vec<String> = columns.iter().map(|c| Self::quote_identifier(c)).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            Self::quote_identifier(table),
            names.join(", "),
            placeholders
        )
    }

    /// `ALTER TABLE … ADD CONSTRAINT … FOREIGN KEY` for one relationship
    pub fn add_foreign_key(relationship: &Relationship) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            Self::quote_identifier(&relationship.source.table),
            Self::quote_identifier(&relationship.constraint_name()),
            Self::quote_identifier(&relationship.source.column),
            Self::quote_identifier(&relationship.target.table),
            Self::quote_identifier(&relationship.target.column),
        )
    }

    /// Full DDL script: every table in schema order, then every constraint
    pub fn export_schema(schema: &Schema, relationships: &[Relationship]) -> String {
        let mut sql = String::new();
        for table in schema.tables.values() {
            sql.push_str(&Self::create_table(table));
            sql.push_str(";\n");
        }
        if !relationships.is_empty() {
            sql.push('\n');
        }
        for relationship in relationships {
            sql.push_str(&format!("-- {}\n", relationship));
            sql.push_str(&Self::add_foreign_key(relationship));
            sql.push_str(";\n");
        }
        sql
    }

    /// Quote an identifier with double quotes, doubling internal quotes
    pub fn quote_identifier(identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }
}
