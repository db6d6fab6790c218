//! Column type inference

use super::formats::common_format;
use crate::config::ModellerConfig;
use crate::models::value::parse_bool;
use crate::models::{Column, DataType, RawTable};

/// Kind of a single non-missing value
///
/// Booleans are tracked apart from integers so that a column mixing `true`
/// with `5` widens to text instead of silently becoming numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Boolean,
    Integer,
    Real,
    Text,
}

impl ValueKind {
    fn classify(value: &str) -> Self {
        let value = value.trim();
        if value.parse::<i64>().is_ok() {
            ValueKind::Integer
        } else if parse_bool(value).is_some() {
            ValueKind::Boolean
        } else if value.parse::<f64>().is_ok_and(f64::is_finite) {
            ValueKind::Real
        } else {
            ValueKind::Text
        }
    }

    /// Narrowest kind both values fit
    fn merge_with(self, other: ValueKind) -> ValueKind {
        match (self, other) {
            (a, b) if a == b => a,
            (ValueKind::Integer, ValueKind::Real) | (ValueKind::Real, ValueKind::Integer) => {
                ValueKind::Real
            }
            _ => ValueKind::Text,
        }
    }

    fn data_type(self) -> DataType {
        match self {
            // Stored as 0/1
            ValueKind::Boolean | ValueKind::Integer => DataType::Integer,
            ValueKind::Real => DataType::Real,
            ValueKind::Text => DataType::Text,
        }
    }
}

/// Infers a primitive type and nullability for every column of a table
pub struct TypeInferencer<'a> {
    config: &'a ModellerConfig,
}

impl<'a> TypeInferencer<'a> {
    pub fn new(config: &'a ModellerConfig) -> Self {
        Self { config }
    }

    /// Infer all columns of a table, in header order
    pub fn infer_table(&self, table: &RawTable) -> Vec<Column> {
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| self.infer_column(name, table.column_values(idx)))
            .collect()
    }

    /// Infer one column from its cells (`None` = missing)
    ///
    /// Never fails: a column without any observed value is nullable text.
    pub fn infer_column<'v>(
        &self,
        name: &str,
        values: impl IntoIterator<Item = Option<&'v str>>,
    ) -> Column {
        let mut kind: Option<ValueKind> = None;
        let mut missing = false;
        let mut present = Vec::new();

        for value in values {
            match value {
                Some(v) => {
                    let k = ValueKind::classify(v);
                    kind = Some(kind.map_or(k, |acc| acc.merge_with(k)));
                    present.push(v);
                }
                None => missing = true,
            }
        }

        let Some(kind) = kind else {
            return Column::new(name.to_string(), DataType::Text, true);
        };

        let data_type = kind.data_type();
        let format = if data_type == DataType::Text && self.config.detect_formats {
            common_format(present)
        } else {
            None
        };

        Column::new(name.to_string(), data_type, missing).with_format(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::TextFormat;
    use crate::models::CellValue;

    fn infer(values: &[Option<&str>]) -> Column {
        let config = ModellerConfig::default();
        TypeInferencer::new(&config).infer_column("c", values.iter().copied())
    }

    #[test]
    fn test_integer_column() {
        let col = infer(&[Some("1"), Some(" 2"), Some("-3")]);
        assert_eq!(col.data_type, DataType::Integer);
        assert!(!col.nullable);
    }

    #[test]
    fn test_integer_and_real_widen_to_real() {
        let col = infer(&[Some("1"), Some("2.5")]);
        assert_eq!(col.data_type, DataType::Real);
    }

    #[test]
    fn test_any_text_widens_to_text() {
        let col = infer(&[Some("1"), Some("2.5"), Some("n/a yet")]);
        assert_eq!(col.data_type, DataType::Text);
    }

    #[test]
    fn test_booleans_are_integers() {
        let col = infer(&[Some("True"), Some("false")]);
        assert_eq!(col.data_type, DataType::Integer);
    }

    #[test]
    fn test_boolean_mixed_with_number_is_text() {
        let col = infer(&[Some("true"), Some("5")]);
        assert_eq!(col.data_type, DataType::Text);
    }

    #[test]
    fn test_missing_value_makes_nullable() {
        let col = infer(&[Some("1"), None, Some("3")]);
        assert_eq!(col.data_type, DataType::Integer);
        assert!(col.nullable);
    }

    #[test]
    fn test_empty_column_defaults_to_nullable_text() {
        let col = infer(&[None, None]);
        assert_eq!(col.data_type, DataType::Text);
        assert!(col.nullable);

        let col = infer(&[]);
        assert_eq!(col.data_type, DataType::Text);
        assert!(col.nullable);
    }

    #[test]
    fn test_datetime_stays_text_with_format() {
        let col = infer(&[Some("2024-01-15"), Some("2024-02-01")]);
        assert_eq!(col.data_type, DataType::Text);
        assert_eq!(col.format, Some(TextFormat::Date));
    }

    #[test]
    fn test_format_detection_can_be_disabled() {
        let config = ModellerConfig::builder().detect_formats(false).build();
        let col = TypeInferencer::new(&config)
            .infer_column("d", [Some("2024-01-15"), Some("2024-02-01")]);
        assert_eq!(col.format, None);
    }

    #[test]
    fn test_inference_is_a_fixed_point() {
        let samples: Vec<Vec<Option<&str>>> = vec![
            vec![Some("1"), Some("2")],
            vec![Some("2.0"), Some("3.0")],
            vec![Some("1"), Some("2.5"), None],
            vec![Some("true"), Some("FALSE")],
            vec![Some("1e3"), Some("4")],
            vec![Some("abc"), Some("1")],
        ];

        for values in samples {
            let first = infer(&values);
            let rendered: Vec<Option<String>> = values
                .iter()
                .map(|v| {
                    let cell = CellValue::from_raw(*v, first.data_type);
                    (!cell.is_null()).then(|| cell.to_string())
                })
                .collect();
            let second = infer(
                &rendered
                    .iter()
                    .map(|v| v.as_deref())
                    .collect::<Vec<_>>(),
            );
            assert_eq!(first.data_type, second.data_type, "values: {values:?}");
            assert_eq!(first.nullable, second.nullable);
        }
    }
}
