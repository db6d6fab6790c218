//! Typed cell values and the keys used for value-set comparison

use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::DataType;

/// A single cell converted to its column's inferred type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    /// Convert a raw cell to the given column type.
    ///
    /// Missing cells become `Null`. A value that does not parse as the
    /// requested numeric type falls back to `Text`, which only happens when
    /// the caller passes a type the column was not inferred with.
    pub fn from_raw(raw: Option<&str>, data_type: DataType) -> Self {
        let Some(raw) = raw else {
            return CellValue::Null;
        };
        let trimmed = raw.trim();
        match data_type {
            DataType::Integer => {
                if let Ok(n) = trimmed.parse::<i64>() {
                    CellValue::Integer(n)
                } else if let Some(b) = parse_bool(trimmed) {
                    CellValue::Integer(i64::from(b))
                } else {
                    CellValue::Text(raw.to_string())
                }
            }
            DataType::Real => match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => CellValue::Real(f),
                _ => CellValue::Text(raw.to_string()),
            },
            DataType::Text => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Key used for distinct counts and containment checks.
    ///
    /// Whole reals compare equal to integers (`1` and `1.0` are one value);
    /// text never compares equal to a number.
    pub fn key(&self) -> Option<ValueKey> {
        match self {
            CellValue::Null => None,
            CellValue::Integer(n) => Some(ValueKey::Integer(*n)),
            CellValue::Real(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(ValueKey::Integer(*f as i64))
                } else {
                    Some(ValueKey::Real(f.to_bits()))
                }
            }
            CellValue::Text(s) => Some(ValueKey::Text(s.clone())),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(n) => write!(f, "{n}"),
            // Debug keeps the decimal point on whole values ("2.0"), so a
            // rendered real column re-infers as real.
            CellValue::Real(r) => write!(f, "{r:?}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Hashable, ordered identity of a non-missing cell
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKey {
    Integer(i64),
    /// Bit pattern of a non-whole finite real
    Real(u64),
    Text(String),
}

/// Parse a boolean literal (`true`/`false`, any case)
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
