//! Column model for inferred tables

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inference::TextFormat;

/// Primitive column type, ordered from narrowest to widest
///
/// `Integer ⊂ Real ⊂ Text`: a value that fits a narrower type always fits
/// every wider one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Real,
    Text,
}

impl DataType {
    /// Native DuckDB type used when the column is materialized
    pub fn native_type(&self) -> &'static str {
        match self {
            DataType::Integer => "BIGINT",
            DataType::Real => "DOUBLE",
            DataType::Text => "VARCHAR",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "integer"),
            DataType::Real => write!(f, "real"),
            DataType::Text => write!(f, "text"),
        }
    }
}

/// Column model produced by type inference
///
/// A column is nullable when at least one observed value is missing, or when
/// no value was observed at all.
///
/// # Example
///
/// ```rust
/// use data_modeller::models::{Column, DataType};
///
/// let column = Column::new("CustomerID".to_string(), DataType::Integer, false);
/// assert!(!column.nullable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name as it appears in the block header
    pub name: String,
    /// Narrowest type every non-missing value fits
    pub data_type: DataType,
    /// Whether at least one value is missing
    pub nullable: bool,
    /// Text format shared by every value (text columns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,
}

impl Column {
    pub fn new(name: String, data_type: DataType, nullable: bool) -> Self {
        Self {
            name,
            data_type,
            nullable,
            format: None,
        }
    }

    pub fn with_format(mut self, format: Option<TextFormat>) -> Self {
        self.format = format;
        self
    }
}
