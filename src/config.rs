//! Configuration for a modelling run

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("Could not read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value that parses but makes no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What to do when a table already exists in the target store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerunPolicy {
    /// Drop the existing table and recreate it (default)
    #[default]
    Replace,
    /// Fail before touching the store
    Reject,
}

impl std::str::FromStr for RerunPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(RerunPolicy::Replace),
            "reject" => Ok(RerunPolicy::Reject),
            _ => Err(format!(
                "Invalid rerun policy: {}. Expected: replace, reject",
                s
            )),
        }
    }
}

/// Configuration for segmentation, inference and materialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModellerConfig {
    /// Column-name suffix marking identifier columns
    pub identifier_suffix: String,

    /// Replaces the identifier suffix when naming a table (`CustomerID` -> `Customers`)
    pub plural_marker: String,

    /// Name of the synthesized primary key when no natural key exists
    pub surrogate_key: String,

    /// Values treated as missing after trimming
    pub null_markers: Vec<String>,

    /// Annotate text columns with a detected format (date, email, ...)
    pub detect_formats: bool,

    /// Behaviour when a table already exists in the store
    pub rerun_policy: RerunPolicy,
}

impl Default for ModellerConfig {
    fn default() -> Self {
        Self {
            identifier_suffix: "ID".to_string(),
            plural_marker: "s".to_string(),
            surrogate_key: "id".to_string(),
            null_markers: ["", "NA", "N/A", "NULL", "null", "NaN", "nan"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            detect_formats: true,
            rerun_policy: RerunPolicy::Replace,
        }
    }
}

impl ModellerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ModellerConfigBuilder {
        ModellerConfigBuilder::default()
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ModellerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Whether a trimmed cell counts as missing
    pub fn is_null_marker(&self, trimmed: &str) -> bool {
        trimmed.is_empty() || self.null_markers.iter().any(|m| m == trimmed)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.identifier_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "identifierSuffix must not be empty".to_string(),
            ));
        }
        if self.surrogate_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "surrogateKey must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ModellerConfig
#[derive(Debug, Default)]
pub struct ModellerConfigBuilder {
    config: ModellerConfig,
}

impl ModellerConfigBuilder {
    /// Set the identifier column suffix
    pub fn identifier_suffix(mut self, suffix: &str) -> Self {
        self.config.identifier_suffix = suffix.to_string();
        self
    }

    /// Set the marker that replaces the suffix in table names
    pub fn plural_marker(mut self, marker: &str) -> Self {
        self.config.plural_marker = marker.to_string();
        self
    }

    /// Set the surrogate key column name
    pub fn surrogate_key(mut self, name: &str) -> Self {
        self.config.surrogate_key = name.to_string();
        self
    }

    /// Replace the list of null markers
    pub fn null_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.null_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable text format detection
    pub fn detect_formats(mut self, detect: bool) -> Self {
        self.config.detect_formats = detect;
        self
    }

    /// Set the rerun policy
    pub fn rerun_policy(mut self, policy: RerunPolicy) -> Self {
        self.config.rerun_policy = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ModellerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModellerConfig::default();
        assert_eq!(config.identifier_suffix, "ID");
        assert_eq!(config.plural_marker, "s");
        assert_eq!(config.surrogate_key, "id");
        assert_eq!(config.rerun_policy, RerunPolicy::Replace);
        assert!(config.is_null_marker(""));
        assert!(config.is_null_marker("NaN"));
        assert!(!config.is_null_marker("0"));
    }

    #[test]
    fn test_builder() {
        let config = ModellerConfig::builder()
            .identifier_suffix("_id")
            .plural_marker("")
            .null_markers(["", "-"])
            .rerun_policy(RerunPolicy::Reject)
            .build();

        assert_eq!(config.identifier_suffix, "_id");
        assert_eq!(config.plural_marker, "");
        assert!(config.is_null_marker("-"));
        assert!(!config.is_null_marker("NA"));
        assert_eq!(config.rerun_policy, RerunPolicy::Reject);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ModellerConfig::from_toml_str(
            r#"
            pluralMarker = "_table"
            rerunPolicy = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.plural_marker, "_table");
        assert_eq!(config.rerun_policy, RerunPolicy::Reject);
        assert_eq!(config.identifier_suffix, "ID");
    }

    #[test]
    fn test_from_toml_rejects_empty_suffix() {
        let result = ModellerConfig::from_toml_str(r#"identifierSuffix = """#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rerun_policy_from_str() {
        assert_eq!(
            "Replace".parse::<RerunPolicy>().unwrap(),
            RerunPolicy::Replace
        );
        assert_eq!("reject".parse::<RerunPolicy>().unwrap(), RerunPolicy::Reject);
        assert!("merge".parse::<RerunPolicy>().is_err());
    }
}
