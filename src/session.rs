//! One modelling run, from source text to store
//!
//! ```rust
//! use data_modeller::{ModellerConfig, ModellingSession};
//!
//! let mut session = ModellingSession::new(ModellerConfig::default());
//! session
//!     .load_str("CustomerID,Name\n1,Alice\n2,Bob\n\nOrderID,CustomerID\n10,1\n11,2")
//!     .unwrap();
//!
//! let analysis = session.analyze().unwrap();
//! assert_eq!(analysis.schema.table_names().collect::<Vec<_>>(), vec!["Customers", "Orders"]);
//! assert_eq!(
//!     analysis.relationships[0].to_string(),
//!     "Orders.CustomerID -> Customers.CustomerID"
//! );
//! ```

use std::path::Path;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::ModellerConfig;
use crate::error::{ModellerError, ValidationError};
use crate::export::SqlExporter;
use crate::import::MultiTableImporter;
use crate::inference::{KeyInferencer, SchemaAssembler, TableProfile, TypeInferencer};
use crate::models::{PrimaryKey, RawTable, Relationship, RunReport, Schema};
use crate::validation::{RelationshipValidator, reserved_identifiers, validate_ddl};

#[cfg(feature = "duckdb-backend")]
use crate::database::{Materializer, StoreTarget};

/// Inferred schema and relationships of the loaded tables
#[derive(Debug, Clone)]
pub struct Analysis {
    pub schema: Schema,
    pub relationships: Vec<Relationship>,
    /// Advisory findings: reference cycles, reserved identifiers
    pub warnings: Vec<String>,
}

/// Holds everything one run needs; nothing outlives it
#[derive(Debug)]
pub struct ModellingSession {
    config: ModellerConfig,
    tables: IndexMap<String, RawTable>,
    analysis: Option<Analysis>,
}

impl ModellingSession {
    pub fn new(config: ModellerConfig) -> Self {
        Self {
            config,
            tables: IndexMap::new(),
            analysis: None,
        }
    }

    pub fn config(&self) -> &ModellerConfig {
        &self.config
    }

    /// Load tables from a file, replacing anything loaded before
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ModellerError> {
        let tables = MultiTableImporter::new(&self.config).import_file(path)?;
        self.replace_tables(tables)
    }

    /// Load tables from text, replacing anything loaded before
    pub fn load_str(&mut self, content: &str) -> Result<usize, ModellerError> {
        let tables = MultiTableImporter::new(&self.config).parse(content)?;
        self.replace_tables(tables)
    }

    fn replace_tables(&mut self, tables: IndexMap<String, RawTable>) -> Result<usize, ModellerError> {
        self.analysis = None;
        self.tables = tables;
        if self.tables.is_empty() {
            return Err(ValidationError::NoTables.into());
        }
        Ok(self.tables.len())
    }

    pub fn tables(&self) -> &IndexMap<String, RawTable> {
        &self.tables
    }

    fn rows_parsed(&self) -> usize {
        self.tables.values().map(RawTable::row_count).sum()
    }

    /// Infer the schema and relationships, once per load
    pub fn analyze(&mut self) -> Result<&Analysis, ModellerError> {
        let analysis = match self.analysis.take() {
            Some(analysis) => analysis,
            None => analyze_tables(&self.config, &self.tables)?,
        };
        Ok(self.analysis.insert(analysis))
    }

    /// DDL script for the inferred schema, without touching a store
    pub fn ddl_script(&mut self) -> Result<String, ModellerError> {
        let analysis = self.analyze()?;
        Ok(SqlExporter::export_schema(
            &analysis.schema,
            &analysis.relationships,
        ))
    }

    /// Report of what a run would create; nothing is loaded and no
    /// constraints are attempted
    pub fn report(&mut self) -> Result<RunReport, ModellerError> {
        let rows = self.rows_parsed();
        let analysis = self.analyze()?;
        let mut report = RunReport::new(
            analysis.schema.table_names().map(str::to_string).collect(),
            analysis.relationships.clone(),
        );
        report.warnings = analysis.warnings.clone();
        report.rows_parsed = rows;
        Ok(report)
    }

    /// Write the analysed tables into `target` and apply relationships.
    ///
    /// Ends the session; the store connection is closed when this returns.
    #[cfg(feature = "duckdb-backend")]
    pub fn materialize(mut self, target: &StoreTarget) -> Result<RunReport, ModellerError> {
        let analysis = match self.analysis.take() {
            Some(analysis) => analysis,
            None => analyze_tables(&self.config, &self.tables)?,
        };

        let outcome = Materializer::open(target, self.config.rerun_policy)?.materialize(
            &analysis.schema,
            &self.tables,
            &analysis.relationships,
        )?;
        info!(
            "Materialized {} tables ({} rows) into {}, {} of {} constraints applied",
            outcome.tables.len(),
            outcome.rows_loaded,
            target,
            outcome
                .constraints
                .iter()
                .filter(|c| c.outcome.is_applied())
                .count(),
            outcome.constraints.len()
        );

        let mut report = RunReport::new(outcome.tables, analysis.relationships);
        report.constraints = outcome.constraints;
        report.warnings = analysis.warnings;
        report.rows_parsed = self.rows_parsed();
        report.rows_loaded = outcome.rows_loaded;
        Ok(report)
    }
}

fn analyze_tables(
    config: &ModellerConfig,
    tables: &IndexMap<String, RawTable>,
) -> Result<Analysis, ModellerError> {
    if tables.is_empty() {
        return Err(ValidationError::NoTables.into());
    }

    let types = TypeInferencer::new(config);
    let keys = KeyInferencer::new(config);

    let profiles: Vec<TableProfile<'_>> = tables
        .values()
        .map(|table| TableProfile::new(table, types.infer_table(table)))
        .collect();
    let primary_keys: Vec<PrimaryKey> = profiles.iter().map(|p| keys.primary_key(p)).collect();
    let relationships = keys.discover_relationships(&profiles);
    let schema = SchemaAssembler::assemble(
        profiles
            .iter()
            .zip(&primary_keys)
            .map(|(p, pk)| (p.table.name(), p.columns.as_slice(), pk)),
    );

    let validation = RelationshipValidator::new().validate(&profiles, &relationships);
    let mut warnings: Vec<String> = validation.issues.iter().map(ToString::to_string).collect();
    for cycle in &validation.cycles {
        warnings.push(format!("Tables {} reference each other", cycle.join(", ")));
    }
    warnings.extend(reserved_identifiers(&schema));
    if let Err(e) = validate_ddl(&SqlExporter::export_schema(&schema, &relationships)) {
        warnings.push(e);
    }
    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok(Analysis {
        schema,
        relationships,
        warnings,
    })
}
