//! Crate-level error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::database::MaterializationError;
use crate::import::LoadError;

/// Input parsed, but gave nothing to model
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Source text was empty or whitespace only
    #[error("No tables found in input")]
    NoTables,
}

/// Pipeline stage at which a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Load,
    Validation,
    Materialization,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Load => "load",
            Stage::Validation => "validation",
            Stage::Materialization => "materialization",
        };
        f.write_str(name)
    }
}

/// Any error a modelling run can surface
#[derive(Error, Debug)]
pub enum ModellerError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Materialization(#[from] MaterializationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ModellerError {
    pub fn stage(&self) -> Stage {
        match self {
            ModellerError::Load(_) => Stage::Load,
            ModellerError::Validation(_) => Stage::Validation,
            ModellerError::Materialization(_) => Stage::Materialization,
            ModellerError::Config(_) => Stage::Config,
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ModellerError::Load(err) => err.user_message(),
            ModellerError::Validation(ValidationError::NoTables) => {
                "No tables found in input.\n\n\
                Hint: Tables are comma-separated blocks separated by blank lines."
                    .to_string()
            }
            ModellerError::Materialization(err) => err.user_message(),
            ModellerError::Config(err) => {
                format!("{err}\n\nHint: Check the keys and values of your configuration file.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_of_wrapped_errors() {
        let err: ModellerError = ValidationError::NoTables.into();
        assert_eq!(err.stage(), Stage::Validation);
        assert_eq!(err.stage().to_string(), "validation");
        assert!(err.user_message().contains("Hint:"));

        let err: ModellerError = LoadError::MissingIdentifierColumn {
            line: 1,
            suffix: "ID".to_string(),
            columns: vec!["Name".to_string(), "Age".to_string()],
        }
        .into();
        assert_eq!(err.stage(), Stage::Load);
    }
}
