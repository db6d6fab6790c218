//! Models module
//!
//! Data structures shared by every stage of a modelling run: raw tables from
//! segmentation, inferred columns, the assembled schema, relationships and the
//! final run report.

pub mod column;
pub mod relationship;
pub mod report;
pub mod schema;
pub mod table;
pub mod value;

pub use column::{Column, DataType};
pub use relationship::{ColumnRef, ConstraintOutcome, ConstraintResult, Relationship};
pub use report::RunReport;
pub use schema::{ColumnConstraint, PrimaryKey, Schema, SchemaColumn, TableSchema};
pub use table::RawTable;
pub use value::{CellValue, ValueKey};
