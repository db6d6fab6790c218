//! Format detection for text values

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Detected text format
///
/// Purely descriptive: values keep their original text in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextFormat {
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    /// ISO 8601 date-time (YYYY-MM-DDTHH:MM:SS)
    DateTime,
    /// Time (HH:MM:SS)
    Time,
    /// Email address
    Email,
    /// UUID/GUID
    Uuid,
}

impl std::fmt::Display for TextFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextFormat::Date => write!(f, "date"),
            TextFormat::DateTime => write!(f, "date-time"),
            TextFormat::Time => write!(f, "time"),
            TextFormat::Email => write!(f, "email"),
            TextFormat::Uuid => write!(f, "uuid"),
        }
    }
}

// Regex patterns for format detection
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2}(\.\d+)?)?$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Detect the format of a single trimmed value
pub fn detect_format(value: &str) -> Option<TextFormat> {
    if DATE_REGEX.is_match(value) {
        Some(TextFormat::Date)
    } else if DATETIME_REGEX.is_match(value) {
        Some(TextFormat::DateTime)
    } else if TIME_REGEX.is_match(value) {
        Some(TextFormat::Time)
    } else if UUID_REGEX.is_match(value) {
        Some(TextFormat::Uuid)
    } else if EMAIL_REGEX.is_match(value) {
        Some(TextFormat::Email)
    } else {
        None
    }
}

/// Format shared by every value, if there is one
pub fn common_format<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<TextFormat> {
    let mut common = None;
    for value in values {
        let format = detect_format(value.trim())?;
        match common {
            None => common = Some(format),
            Some(existing) if existing == format => {}
            Some(_) => return None,
        }
    }
    common
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_formats() {
        assert_eq!(detect_format("2024-01-15"), Some(TextFormat::Date));
        assert_eq!(
            detect_format("2024-01-15T10:30:00Z"),
            Some(TextFormat::DateTime)
        );
        assert_eq!(detect_format("2024-01-15 10:30"), Some(TextFormat::DateTime));
        assert_eq!(detect_format("10:30:00"), Some(TextFormat::Time));
        assert_eq!(detect_format("a@example.com"), Some(TextFormat::Email));
        assert_eq!(
            detect_format("550e8400-e29b-41d4-a716-446655440000"),
            Some(TextFormat::Uuid)
        );
        assert_eq!(detect_format("hello"), None);
    }

    #[test]
    fn test_common_format_requires_agreement() {
        assert_eq!(
            common_format(["2024-01-01", "2024-02-01"]),
            Some(TextFormat::Date)
        );
        assert_eq!(common_format(["2024-01-01", "10:00"]), None);
        assert_eq!(common_format(["2024-01-01", "soon"]), None);
        assert_eq!(common_format(Vec::<&str>::new()), None);
    }
}
