//! SQL identifier and syntax checks

use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::{
    ALL_KEYWORDS, ALL_KEYWORDS_INDEX, Keyword, RESERVED_FOR_COLUMN_ALIAS,
    RESERVED_FOR_TABLE_ALIAS,
};
use sqlparser::parser::Parser;

use crate::models::Schema;

/// Whether `name`, unquoted, would be read as a reserved SQL keyword
pub fn is_reserved_word(name: &str) -> bool {
    let upper = name.to_uppercase();
    let Ok(index) = ALL_KEYWORDS.binary_search(&upper.as_str()) else {
        return false;
    };
    let keyword: Keyword = ALL_KEYWORDS_INDEX[index];
    RESERVED_FOR_TABLE_ALIAS.contains(&keyword) || RESERVED_FOR_COLUMN_ALIAS.contains(&keyword)
}

/// Table and column names of `schema` that collide with reserved keywords.
///
/// Generated SQL always quotes identifiers, so these are warnings: a store
/// may still reject statements that involve them.
pub fn reserved_identifiers(schema: &Schema) -> Vec<String> {
    let mut warnings = Vec::new();
    for table in schema.tables.values() {
        if is_reserved_word(&table.name) {
            warnings.push(format!(
                "Table name {} is a reserved SQL keyword",
                table.name
            ));
        }
        for column in &table.columns {
            if is_reserved_word(&column.name) {
                warnings.push(format!(
                    "Column name {}.{} is a reserved SQL keyword",
                    table.name, column.name
                ));
            }
        }
    }
    warnings
}

/// Validate SQL syntax using sqlparser
pub fn validate_ddl(script: &str) -> Result<(), String> {
    let dialect = GenericDialect {};

    Parser::parse_sql(&dialect, script).map_err(|e| format!("SQL validation failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnConstraint, DataType, PrimaryKey, SchemaColumn, TableSchema};

    fn table(name: &str, columns: &[&str]) -> TableSchema {
        TableSchema {
            name: name.to_string(),
            columns: columns
                .iter()
                .map(|c| SchemaColumn {
                    name: c.to_string(),
                    data_type: DataType::Integer,
                    constraints: vec![ColumnConstraint::NotNull],
                })
                .collect(),
            primary_key: PrimaryKey::Natural(columns[0].to_string()),
        }
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved_word("Order"));
        assert!(is_reserved_word("select"));
        assert!(!is_reserved_word("Customers"));
        assert!(!is_reserved_word("OrderID"));
    }

    #[test]
    fn test_reserved_identifiers_lists_tables_and_columns() {
        let mut schema = Schema::new();
        schema.insert(table("Order", &["OrderID"]));
        schema.insert(table("Customers", &["CustomerID", "from"]));

        let warnings = reserved_identifiers(&schema);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Order"));
        assert!(warnings[1].contains("Customers.from"));
    }

    #[test]
    fn test_validate_ddl() {
        assert!(validate_ddl(r#"CREATE TABLE "Order" ("OrderID" BIGINT PRIMARY KEY)"#).is_ok());
        assert!(validate_ddl("CREATE TABLE (").is_err());
    }
}
