//! Run report handed back to the caller

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::relationship::{ConstraintResult, Relationship};

/// Summary of one modelling run
///
/// `relationships` lists every discovered relationship, whether or not the
/// store accepted it as a constraint; `constraints` says what happened to
/// each one. When the run stopped before a store was touched (DDL export),
/// `constraints` is empty and `rows_loaded` is zero; `rows_parsed` still
/// counts the data rows read from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub tables: Vec<String>,
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub constraints: Vec<ConstraintResult>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub rows_parsed: usize,
    pub rows_loaded: usize,
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(tables: Vec<String>, relationships: Vec<Relationship>) -> Self {
        Self {
            tables,
            relationships,
            constraints: Vec::new(),
            warnings: Vec::new(),
            rows_parsed: 0,
            rows_loaded: 0,
            generated_at: Utc::now(),
        }
    }

    /// `source.column -> target.column` strings, in discovery order
    pub fn relationship_lines(&self) -> Vec<String> {
        self.relationships.iter().map(ToString::to_string).collect()
    }

    pub fn applied_constraints(&self) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.outcome.is_applied())
            .count()
    }

    pub fn skipped_constraints(&self) -> impl Iterator<Item = &ConstraintResult> {
        self.constraints.iter().filter(|c| !c.outcome.is_applied())
    }
}
