//! Store materialization
//!
//! Writes an inferred [`Schema`](crate::models::Schema) and its loaded rows
//! into a DuckDB database, then applies discovered relationships as
//! foreign-key constraints on a best-effort basis.

mod error;
#[cfg(feature = "duckdb-backend")]
mod materializer;

pub use error::MaterializationError;
#[cfg(feature = "duckdb-backend")]
pub use materializer::{MaterializationOutcome, Materializer, MaterializerState};

use std::path::PathBuf;

/// Where materialized tables are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// A database file, created if missing
    File(PathBuf),
    /// A private in-memory database, discarded when the run ends
    Memory,
}

impl std::fmt::Display for StoreTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreTarget::File(path) => write!(f, "{}", path.display()),
            StoreTarget::Memory => f.write_str(":memory:"),
        }
    }
}
