//! Import functionality
//!
//! Splits a text resource holding several comma-separated tables into named
//! [`RawTable`](crate::models::RawTable)s. Blocks are separated by blank lines;
//! the first line of each block is its header.

pub mod blocks;

use std::path::PathBuf;

/// Error while loading the source text
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No identifier column (suffix '{suffix}') in block at line {line}: [{}]", .columns.join(", "))]
    MissingIdentifierColumn {
        line: usize,
        suffix: String,
        columns: Vec<String>,
    },

    #[error("Duplicate column '{column}' in header at line {line}")]
    DuplicateColumn { line: usize, column: String },

    #[error("Line {line} of table {table} has {found} fields, header has {expected}")]
    TooManyFields {
        table: String,
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl LoadError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Io { path, .. } => format!(
                "{self}\n\nHint: Check that {} exists and is readable.",
                path.display()
            ),
            LoadError::MissingIdentifierColumn { suffix, .. } => format!(
                "{self}\n\nHint: Every table needs a column ending in '{suffix}' to be named."
            ),
            LoadError::TooManyFields { .. } => {
                format!("{self}\n\nHint: Quote values that contain commas.")
            }
            _ => self.to_string(),
        }
    }
}

pub use blocks::MultiTableImporter;
