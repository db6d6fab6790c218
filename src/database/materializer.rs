//! DuckDB materializer
//!
//! Runs `Opened -> TablesCreated -> DataLoaded -> ConstraintsApplied -> Closed`.
//! Table creation and row loading share one transaction; constraints are
//! applied afterwards, one statement at a time, so a rejected constraint
//! leaves the loaded tables and earlier constraints in place.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::{MaterializationError, StoreTarget};
use crate::config::RerunPolicy;
use crate::export::SqlExporter;
use crate::models::{
    CellValue, ConstraintOutcome, ConstraintResult, DataType, RawTable, Relationship, Schema,
    TableSchema,
};

/// Lifecycle state of a [`Materializer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializerState {
    Opened,
    TablesCreated,
    DataLoaded,
    /// `partial` is set when at least one constraint was skipped
    ConstraintsApplied { partial: bool },
    Closed,
}

/// What a successful materialization did
#[derive(Debug, Clone)]
pub struct MaterializationOutcome {
    pub tables: Vec<String>,
    pub rows_loaded: usize,
    pub constraints: Vec<ConstraintResult>,
    /// Every state entered, in order, ending with `Closed`
    pub states: Vec<MaterializerState>,
}

/// Writes a schema and its rows into a DuckDB store
pub struct Materializer {
    conn: duckdb::Connection,
    policy: RerunPolicy,
    state: MaterializerState,
    states: Vec<MaterializerState>,
}

/// Where an inserted column takes its values from
enum ValueSource {
    /// Row number, starting at 1
    Surrogate,
    Raw { index: usize, data_type: DataType },
}

impl Materializer {
    /// Open (or create) the target store
    pub fn open(target: &StoreTarget, policy: RerunPolicy) -> Result<Self, MaterializationError> {
        let conn = match target {
            StoreTarget::File(path) => duckdb::Connection::open(path),
            StoreTarget::Memory => duckdb::Connection::open_in_memory(),
        }
        .map_err(|e| MaterializationError::Open {
            target: target.to_string(),
            message: e.to_string(),
        })?;
        debug!("Opened store {}", target);

        Ok(Self {
            conn,
            policy,
            state: MaterializerState::Opened,
            states: vec![MaterializerState::Opened],
        })
    }

    pub fn state(&self) -> MaterializerState {
        self.state
    }

    /// Create and load every table in schema order, then apply relationships.
    ///
    /// Consumes the materializer: the connection is closed on return, whether
    /// the run succeeded or failed.
    pub fn materialize(
        mut self,
        schema: &Schema,
        tables: &IndexMap<String, RawTable>,
        relationships: &[Relationship],
    ) -> Result<MaterializationOutcome, MaterializationError> {
        let result = self.run(schema, tables, relationships);
        if let Err(err) = &result {
            warn!("Materialization failed, load rolled back: {}", err);
        }
        advance(&mut self.state, &mut self.states, MaterializerState::Closed);
        let states = std::mem::take(&mut self.states);
        drop(self);

        result.map(|(rows_loaded, constraints)| MaterializationOutcome {
            tables: schema.table_names().map(str::to_string).collect(),
            rows_loaded,
            constraints,
            states,
        })
    }

    fn run(
        &mut self,
        schema: &Schema,
        tables: &IndexMap<String, RawTable>,
        relationships: &[Relationship],
    ) -> Result<(usize, Vec<ConstraintResult>), MaterializationError> {
        if self.policy == RerunPolicy::Reject {
            self.reject_existing(schema)?;
        }

        let rows_loaded = self.create_and_load(schema, tables)?;
        let constraints = self.apply_constraints(relationships);
        Ok((rows_loaded, constraints))
    }

    fn reject_existing(&self, schema: &Schema) -> Result<(), MaterializationError> {
        for name in schema.table_names() {
            let count: i64 = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM information_schema.tables WHERE lower(table_name) = lower(?)",
                    duckdb::params![name],
                    |row| row.get(0),
                )
                .map_err(|e| MaterializationError::Lookup {
                    table: name.to_string(),
                    message: e.to_string(),
                })?;
            if count > 0 {
                return Err(MaterializationError::TableExists {
                    table: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// One transaction: drop existing tables, create, then insert every row.
    /// Dropping the transaction without commit rolls it back.
    fn create_and_load(
        &mut self,
        schema: &Schema,
        tables: &IndexMap<String, RawTable>,
    ) -> Result<usize, MaterializationError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| MaterializationError::Transaction(e.to_string()))?;

        // Referencing tables come later in schema order, so drop back to front
        for table in schema.tables.values().rev() {
            tx.execute_batch(&SqlExporter::drop_table(&table.name))
                .map_err(|e| MaterializationError::CreateTable {
                    table: table.name.clone(),
                    message: e.to_string(),
                })?;
        }
        for table in schema.tables.values() {
            tx.execute_batch(&SqlExporter::create_table(table))
                .map_err(|e| MaterializationError::CreateTable {
                    table: table.name.clone(),
                    message: e.to_string(),
                })?;
            info!("Created table {}", table.name);
        }
        advance(&mut self.state, &mut self.states, MaterializerState::TablesCreated);

        let mut rows_loaded = 0;
        for table in schema.tables.values() {
            let raw = tables
                .get(&table.name)
                .ok_or_else(|| MaterializationError::SchemaMismatch {
                    table: table.name.clone(),
                    message: "no rows were loaded for this table".to_string(),
                })?;
            let loaded = insert_rows(&tx, table, raw)?;
            info!("Loaded {} rows into {}", loaded, table.name);
            rows_loaded += loaded;
        }

        tx.commit()
            .map_err(|e| MaterializationError::Transaction(e.to_string()))?;
        advance(&mut self.state, &mut self.states, MaterializerState::DataLoaded);

        Ok(rows_loaded)
    }

    /// Apply each relationship as its own statement. Failures are recorded,
    /// never raised.
    fn apply_constraints(&mut self, relationships: &[Relationship]) -> Vec<ConstraintResult> {
        let mut results = Vec::with_capacity(relationships.len());

        for relationship in relationships {
            let constraint_name = relationship.constraint_name();
            let outcome = match self
                .conn
                .execute_batch(&SqlExporter::add_foreign_key(relationship))
            {
                Ok(()) => {
                    debug!("Applied constraint {}", constraint_name);
                    ConstraintOutcome::Applied
                }
                Err(e) => {
                    warn!(
                        "Could not add foreign key constraint {} ({}): {}",
                        constraint_name, relationship, e
                    );
                    ConstraintOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            };
            results.push(ConstraintResult {
                relationship: relationship.clone(),
                constraint_name,
                outcome,
            });
        }

        let partial = results.iter().any(|r| !r.outcome.is_applied());
        advance(
            &mut self.state,
            &mut self.states,
            MaterializerState::ConstraintsApplied { partial },
        );
        results
    }
}

fn insert_rows(
    conn: &duckdb::Connection,
    table: &TableSchema,
    raw: &RawTable,
) -> Result<usize, MaterializationError> {
    let sources = table
        .columns
        .iter()
        .map(|column| {
            if table.primary_key.is_surrogate() && column.name == table.primary_key.column() {
                return Ok(ValueSource::Surrogate);
            }
            raw.column_index(&column.name)
                .map(|index| ValueSource::Raw {
                    index,
                    data_type: column.data_type,
                })
                .ok_or_else(|| MaterializationError::SchemaMismatch {
                    table: table.name.clone(),
                    message: format!("column {} is missing from the loaded rows", column.name),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    let mut stmt = conn
        .prepare(&SqlExporter::insert(&table.name, &names))
        .map_err(|e| MaterializationError::Insert {
            table: table.name.clone(),
            row: 0,
            message: e.to_string(),
        })?;

    for (row_index, row) in raw.rows().iter().enumerate() {
        let values: Vec<duckdb::types::Value> = sources
            .iter()
            .map(|source| match source {
                ValueSource::Surrogate => duckdb::types::Value::BigInt(row_index as i64 + 1),
                ValueSource::Raw { index, data_type } => {
                    to_store_value(CellValue::from_raw(row[*index].as_deref(), *data_type))
                }
            })
            .collect();

        stmt.execute(duckdb::params_from_iter(values))
            .map_err(|e| MaterializationError::Insert {
                table: table.name.clone(),
                row: row_index + 1,
                message: e.to_string(),
            })?;
    }

    Ok(raw.row_count())
}

fn to_store_value(value: CellValue) -> duckdb::types::Value {
    match value {
        CellValue::Null => duckdb::types::Value::Null,
        CellValue::Integer(n) => duckdb::types::Value::BigInt(n),
        CellValue::Real(f) => duckdb::types::Value::Double(f),
        CellValue::Text(s) => duckdb::types::Value::Text(s),
    }
}

fn advance(
    state: &mut MaterializerState,
    trace: &mut Vec<MaterializerState>,
    next: MaterializerState,
) {
    debug!("Materializer {:?} -> {:?}", state, next);
    *state = next;
    trace.push(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModellerConfig;
    use crate::import::MultiTableImporter;
    use crate::inference::{KeyInferencer, SchemaAssembler, TableProfile, TypeInferencer};
    use tempfile::TempDir;

    fn prepare(text: &str) -> (Schema, IndexMap<String, RawTable>, Vec<Relationship>) {
        let config = ModellerConfig::default();
        let tables = MultiTableImporter::new(&config).parse(text).unwrap();
        let types = TypeInferencer::new(&config);
        let keys = KeyInferencer::new(&config);
        let profiles: Vec<TableProfile> = tables
            .values()
            .map(|t| TableProfile::new(t, types.infer_table(t)))
            .collect();
        let pks: Vec<_> = profiles.iter().map(|p| keys.primary_key(p)).collect();
        let relationships = keys.discover_relationships(&profiles);
        let schema = SchemaAssembler::assemble(
            profiles
                .iter()
                .zip(&pks)
                .map(|(p, pk)| (p.table.name(), p.columns.as_slice(), pk)),
        );
        drop(profiles);
        (schema, tables, relationships)
    }

    const CUSTOMERS_ORDERS: &str = "CustomerID,Name\n1,Alice\n2,Bob\n\nOrderID,CustomerID\n10,1\n11,2";

    #[test]
    fn test_materialize_in_memory_walks_every_state() {
        let (schema, tables, rels) = prepare(CUSTOMERS_ORDERS);
        let materializer = Materializer::open(&StoreTarget::Memory, RerunPolicy::Replace).unwrap();
        assert_eq!(materializer.state(), MaterializerState::Opened);

        let outcome = materializer.materialize(&schema, &tables, &rels).unwrap();
        assert_eq!(outcome.tables, vec!["Customers", "Orders"]);
        assert_eq!(outcome.rows_loaded, 4);
        assert_eq!(outcome.constraints.len(), 1);

        assert_eq!(outcome.states.first(), Some(&MaterializerState::Opened));
        assert_eq!(outcome.states[1], MaterializerState::TablesCreated);
        assert_eq!(outcome.states[2], MaterializerState::DataLoaded);
        assert!(matches!(
            outcome.states[3],
            MaterializerState::ConstraintsApplied { .. }
        ));
        assert_eq!(outcome.states.last(), Some(&MaterializerState::Closed));
    }

    #[test]
    fn test_surrogate_key_values_follow_row_order() {
        let (schema, tables, rels) = prepare("TagID,Label\n1,a\n1,b\n2,c");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.duckdb");

        Materializer::open(&StoreTarget::File(path.clone()), RerunPolicy::Replace)
            .unwrap()
            .materialize(&schema, &tables, &rels)
            .unwrap();

        let conn = duckdb::Connection::open(&path).unwrap();
        let mut stmt = conn
            .prepare(r#"SELECT "id", "Label" FROM "Tags" ORDER BY "id""#)
            .unwrap();
        let rows: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, "c".to_string())
            ]
        );
    }

    #[test]
    fn test_nulls_are_stored_as_null() {
        let (schema, tables, rels) = prepare("ItemID,Price\n1,2.5\n2,");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.duckdb");

        Materializer::open(&StoreTarget::File(path.clone()), RerunPolicy::Replace)
            .unwrap()
            .materialize(&schema, &tables, &rels)
            .unwrap();

        let conn = duckdb::Connection::open(&path).unwrap();
        let nulls: i64 = conn
            .query_row(
                r#"SELECT COUNT(*) FROM "Items" WHERE "Price" IS NULL"#,
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn test_reject_policy_fails_before_mutation() {
        let (schema, tables, rels) = prepare(CUSTOMERS_ORDERS);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.duckdb");
        let target = StoreTarget::File(path.clone());

        Materializer::open(&target, RerunPolicy::Replace)
            .unwrap()
            .materialize(&schema, &tables, &rels)
            .unwrap();

        let err = Materializer::open(&target, RerunPolicy::Reject)
            .unwrap()
            .materialize(&schema, &tables, &rels)
            .unwrap_err();
        assert!(matches!(err, MaterializationError::TableExists { ref table } if table == "Customers"));

        let conn = duckdb::Connection::open(&path).unwrap();
        let count: i64 = conn
            .query_row(r#"SELECT COUNT(*) FROM "Orders""#, [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_no_relationships_is_not_partial() {
        let (schema, tables, rels) = prepare("TagID,Label\n1,a\n2,b");
        assert!(rels.is_empty());
        let outcome = Materializer::open(&StoreTarget::Memory, RerunPolicy::Replace)
            .unwrap()
            .materialize(&schema, &tables, &rels)
            .unwrap();
        assert!(outcome.constraints.is_empty());
        assert_eq!(
            outcome.states[3],
            MaterializerState::ConstraintsApplied { partial: false }
        );
    }

    #[test]
    fn test_missing_rows_for_schema_table_is_an_error() {
        let (schema, _, rels) = prepare(CUSTOMERS_ORDERS);
        let err = Materializer::open(&StoreTarget::Memory, RerunPolicy::Replace)
            .unwrap()
            .materialize(&schema, &IndexMap::new(), &rels)
            .unwrap_err();
        assert!(matches!(err, MaterializationError::SchemaMismatch { .. }));
    }
}
