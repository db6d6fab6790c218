//! Relationship model for inferred foreign keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `table.column` reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Candidate foreign key: every value of `source` occurs in `target`
///
/// Source and target always belong to different tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub source: ColumnRef,
    pub target: ColumnRef,
}

impl Relationship {
    pub fn new(source: ColumnRef, target: ColumnRef) -> Self {
        Self { source, target }
    }

    /// Constraint name used when the relationship is applied to a store
    ///
    /// Includes the target so that a column with several candidate targets
    /// gets a distinct name per constraint.
    pub fn constraint_name(&self) -> String {
        format!(
            "fk_{}_{}_{}_{}",
            self.source.table, self.source.column, self.target.table, self.target.column
        )
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Result of applying one relationship as a store constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ConstraintOutcome {
    Applied,
    Skipped { reason: String },
}

impl ConstraintOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ConstraintOutcome::Applied)
    }
}

/// A relationship together with what the store did with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintResult {
    pub relationship: Relationship,
    pub constraint_name: String,
    pub outcome: ConstraintOutcome,
}
