//! Export functionality
//!
//! Provides exporters for:
//! - SQL (DuckDB DDL, insert and constraint statements)
//! - Run reports (text, JSON, YAML)

pub mod report;
pub mod sql;

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// Re-export for convenience
pub use report::{ReportExporter, ReportFormat};
pub use sql::SqlExporter;
