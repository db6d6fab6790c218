//! Schema inference engine for loaded tables
//!
//! This module turns raw tables into a relational schema:
//!
//! - **Type inference** - Narrowest of integer, real, text per column, plus nullability
//! - **Format detection** - Annotate text columns holding dates, emails, uuids
//! - **Primary keys** - Leftmost all-distinct identifier column, or a surrogate
//! - **Foreign keys** - Value-set containment between identifier columns
//! - **Schema assembly** - Columns, constraints and keys per table
//!
//! ## Example
//!
//! ```rust
//! use data_modeller::config::ModellerConfig;
//! use data_modeller::import::MultiTableImporter;
//! use data_modeller::inference::{KeyInferencer, TableProfile, TypeInferencer};
//!
//! let config = ModellerConfig::default();
//! let tables = MultiTableImporter::new(&config)
//!     .parse("CustomerID,Name\n1,Alice\n2,Bob\n\nOrderID,CustomerID\n10,1\n11,2")
//!     .unwrap();
//!
//! let types = TypeInferencer::new(&config);
//! let profiles: Vec<TableProfile> = tables
//!     .values()
//!     .map(|t| TableProfile::new(t, types.infer_table(t)))
//!     .collect();
//!
//! let relationships = KeyInferencer::new(&config).discover_relationships(&profiles);
//! assert_eq!(relationships[0].to_string(), "Orders.CustomerID -> Customers.CustomerID");
//! ```

mod assembler;
mod formats;
mod keys;
mod types;

use std::collections::BTreeSet;

use crate::models::{CellValue, Column, RawTable, ValueKey};

pub use assembler::SchemaAssembler;
pub use formats::{TextFormat, common_format, detect_format};
pub use keys::KeyInferencer;
pub use types::TypeInferencer;

/// A loaded table together with its inferred columns
#[derive(Debug, Clone)]
pub struct TableProfile<'a> {
    pub table: &'a RawTable,
    pub columns: Vec<Column>,
}

impl<'a> TableProfile<'a> {
    pub fn new(table: &'a RawTable, columns: Vec<Column>) -> Self {
        Self { table, columns }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Distinct non-missing values of a column, compared by typed value
    pub fn value_set(&self, name: &str) -> BTreeSet<ValueKey> {
        let (Some(index), Some(column)) = (self.table.column_index(name), self.column(name)) else {
            return BTreeSet::new();
        };
        self.table
            .column_values(index)
            .filter_map(|raw| CellValue::from_raw(raw, column.data_type).key())
            .collect()
    }
}
