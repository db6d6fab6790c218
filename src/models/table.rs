//! Raw table model produced by block segmentation

use serde::{Deserialize, Serialize};

/// A named table as loaded from one block of the source text
///
/// Rows are stored positionally, aligned with `columns`. A cell is `None`
/// when the source value was missing (empty after trimming, or one of the
/// configured null markers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(name: String, columns: Vec<String>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with missing cells.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, in row order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|cell| cell.as_deref()))
    }

    /// Columns whose name ends with `suffix`, in header order
    pub fn identifier_columns<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |c| c.ends_with(suffix))
    }
}
