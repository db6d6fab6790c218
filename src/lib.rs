//! Data Modeller - Relational schema inference for multi-table CSV text
//!
//! Provides:
//! - Segmentation of blank-line separated CSV blocks into named tables
//! - Column type and nullability inference
//! - Primary key detection and foreign key discovery by value containment
//! - DDL generation and relationship validation
//! - Materialization into a DuckDB store (feature `duckdb-backend`)

pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod import;
pub mod inference;
pub mod models;
pub mod session;
pub mod validation;

pub use config::{ConfigError, ModellerConfig, ModellerConfigBuilder, RerunPolicy};
pub use database::{MaterializationError, StoreTarget};
#[cfg(feature = "duckdb-backend")]
pub use database::{MaterializationOutcome, Materializer, MaterializerState};
pub use error::{ModellerError, Stage, ValidationError};
pub use export::{ReportExporter, ReportFormat, SqlExporter};
pub use import::{LoadError, MultiTableImporter};
pub use models::{
    CellValue, Column, ColumnRef, ConstraintOutcome, ConstraintResult, DataType, PrimaryKey,
    RawTable, Relationship, RunReport, Schema, TableSchema,
};
pub use session::{Analysis, ModellingSession};
