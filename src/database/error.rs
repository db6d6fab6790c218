//! Error types for store materialization

use thiserror::Error;

/// Store-level failure while creating or loading tables.
///
/// Any of these aborts the run; the create/load transaction is rolled back
/// before the error reaches the caller. Rejected constraints are not errors,
/// see [`ConstraintOutcome`](crate::models::ConstraintOutcome).
#[derive(Error, Debug)]
pub enum MaterializationError {
    /// The store could not be opened or created
    #[error("Could not open store {target}: {message}")]
    Open { target: String, message: String },

    /// A table already exists and the rerun policy forbids replacing it
    #[error("Table {table} already exists in the store")]
    TableExists { table: String },

    /// `CREATE TABLE` (or the preceding drop) failed
    #[error("Could not create table {table}: {message}")]
    CreateTable { table: String, message: String },

    /// A row could not be inserted
    #[error("Could not insert row {row} into {table}: {message}")]
    Insert {
        table: String,
        row: usize,
        message: String,
    },

    /// A loaded table has no schema entry, or the reverse
    #[error("Schema and loaded data disagree on table {table}: {message}")]
    SchemaMismatch { table: String, message: String },

    /// Begin or commit failed
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Looking up an existing table failed
    #[error("Could not look up table {table}: {message}")]
    Lookup { table: String, message: String },
}

impl MaterializationError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            MaterializationError::TableExists { table } => format!(
                "Table {table} already exists in the store.\n\n\
                Hint: Set rerunPolicy = \"replace\" or write to a fresh database file."
            ),
            MaterializationError::Open { target, .. } => format!(
                "{self}\n\nHint: Check that the directory of {target} exists and is writable."
            ),
            _ => format!("{self}\n\nHint: No tables were changed; the load was rolled back."),
        }
    }
}
