//! Multi-table CSV segmentation
//!
//! A source holds one or more tables separated by blank lines:
//!
//! ```text
//! CustomerID, Name
//! 1, Alice
//!
//! OrderID, CustomerID
//! 10, 1
//! ```
//!
//! Each block is named after its leftmost identifier column, with the
//! identifier suffix replaced by the plural marker (`CustomerID` -> `Customers`).
//! A later block that derives the same name, ignoring ASCII case, replaces the
//! earlier one in place.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::LoadError;
use crate::config::ModellerConfig;
use crate::models::RawTable;

/// Importer for blank-line separated multi-table CSV text
pub struct MultiTableImporter<'a> {
    config: &'a ModellerConfig,
}

impl<'a> MultiTableImporter<'a> {
    pub fn new(config: &'a ModellerConfig) -> Self {
        Self { config }
    }

    /// Read and segment a file
    pub fn import_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<IndexMap<String, RawTable>, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = self.parse(&content)?;
        info!("Loaded {} tables from {}", tables.len(), path.display());
        Ok(tables)
    }

    /// Segment source text into named tables, in block order.
    ///
    /// Whitespace-only text yields an empty map; deciding whether that is an
    /// error is left to the caller.
    pub fn parse(&self, content: &str) -> Result<IndexMap<String, RawTable>, LoadError> {
        let mut tables = IndexMap::new();

        for block in split_blocks(content) {
            let table = self.parse_block(&block)?;
            debug!(
                "Parsed table {} ({} columns, {} rows)",
                table.name(),
                table.columns().len(),
                table.row_count()
            );
            let existing = tables
                .keys()
                .position(|name: &String| name.eq_ignore_ascii_case(table.name()));
            match existing {
                Some(index) => {
                    debug!("Table {} redefined, later block replaces it", table.name());
                    tables.shift_remove_index(index);
                    tables.shift_insert(index, table.name().to_string(), table);
                }
                None => {
                    tables.insert(table.name().to_string(), table);
                }
            }
        }

        Ok(tables)
    }

    fn parse_block(&self, block: &[(usize, &str)]) -> Result<RawTable, LoadError> {
        let (header_line, header) = block[0];
        let columns = parse_header(header, header_line)?;

        let suffix = &self.config.identifier_suffix;
        let Some(id_column) = columns.iter().find(|c| c.ends_with(suffix.as_str())) else {
            return Err(LoadError::MissingIdentifierColumn {
                line: header_line,
                suffix: suffix.clone(),
                columns,
            });
        };
        let name = table_name(id_column, suffix, &self.config.plural_marker);

        let mut table = RawTable::new(name, columns);
        for &(line, text) in &block[1..] {
            let fields = parse_csv_line(text, ',');
            if fields.len() > table.columns().len() {
                return Err(LoadError::TooManyFields {
                    table: table.name().to_string(),
                    line,
                    expected: table.columns().len(),
                    found: fields.len(),
                });
            }
            let row = fields
                .into_iter()
                .map(|field| {
                    if self.config.is_null_marker(field.trim()) {
                        None
                    } else {
                        Some(field)
                    }
                })
                .collect();
            table.push_row(row);
        }

        Ok(table)
    }
}

/// Derive a table name from its identifier column
pub fn table_name(id_column: &str, suffix: &str, plural_marker: &str) -> String {
    let stem = id_column.strip_suffix(suffix).unwrap_or(id_column);
    format!("{stem}{plural_marker}")
}

/// Group non-blank lines into blocks, keeping 1-based line numbers
fn split_blocks(content: &str) -> Vec<Vec<(usize, &str)>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((idx + 1, line));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_header(line: &str, line_no: usize) -> Result<Vec<String>, LoadError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for (idx, field) in parse_csv_line(line, ',').into_iter().enumerate() {
        let name = field.trim();
        let name = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(LoadError::DuplicateColumn {
                line: line_no,
                column: name,
            });
        }
        columns.push(name);
    }

    Ok(columns)
}

/// Split one line into fields.
///
/// Spaces directly after a delimiter are skipped. A field opening with a
/// double quote runs to the matching quote; `""` inside it is a literal quote.
fn parse_csv_line(line: &str, delimiter: char) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == delimiter {
            result.push(std::mem::take(&mut current));
            at_field_start = true;
        } else if at_field_start && c == ' ' {
            continue;
        } else if at_field_start && c == '"' {
            in_quotes = true;
            at_field_start = false;
        } else {
            current.push(c);
            at_field_start = false;
        }
    }

    result.push(current);
    result
}
