//! Primary key detection and foreign key discovery

use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use super::TableProfile;
use crate::config::ModellerConfig;
use crate::models::{ColumnRef, PrimaryKey, Relationship, ValueKey};

/// Identifier columns of one table with their distinct value sets
struct IdentifierSets<'p> {
    table: &'p str,
    /// Leftmost identifier column, the one the table is named after
    naming_column: Option<&'p str>,
    columns: Vec<(&'p str, BTreeSet<ValueKey>)>,
}

/// Detects primary keys and proposes foreign keys by value containment
pub struct KeyInferencer<'a> {
    config: &'a ModellerConfig,
}

impl<'a> KeyInferencer<'a> {
    pub fn new(config: &'a ModellerConfig) -> Self {
        Self { config }
    }

    /// Choose the primary key of a table.
    ///
    /// The leftmost identifier column whose distinct non-missing values number
    /// exactly the row count wins. Otherwise a surrogate key is named, avoiding
    /// any existing column name (case-insensitively, as the store compares
    /// identifiers).
    pub fn primary_key(&self, profile: &TableProfile<'_>) -> PrimaryKey {
        let rows = profile.table.row_count();
        for column in profile
            .table
            .identifier_columns(&self.config.identifier_suffix)
        {
            if profile.value_set(column).len() == rows {
                return PrimaryKey::Natural(column.to_string());
            }
        }

        PrimaryKey::Surrogate(self.surrogate_name(profile))
    }

    fn surrogate_name(&self, profile: &TableProfile<'_>) -> String {
        let base = &self.config.surrogate_key;
        let taken = |name: &str| {
            profile
                .table
                .columns()
                .iter()
                .any(|c| c.eq_ignore_ascii_case(name))
        };
        if !taken(base) {
            return base.clone();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|name| !taken(name))
            .unwrap_or_else(|| base.clone())
    }

    /// Propose `source.c -> target.d` for every ordered pair of distinct
    /// tables and identifier columns where the non-empty value set of `c` is
    /// contained in the value set of `d`.
    ///
    /// Columns sharing a name are the same logical column seen from two
    /// tables; such a pair is only kept when `d` is the column the target
    /// table is named after (`Orders.CustomerID -> Customers.CustomerID`),
    /// never in the mirrored direction.
    ///
    /// Every satisfying target is kept, so one source column may reference
    /// several tables. Output order follows table order, then header order.
    pub fn discover_relationships(&self, profiles: &[TableProfile<'_>]) -> Vec<Relationship> {
        let sets: Vec<IdentifierSets<'_>> = profiles
            .iter()
            .map(|profile| IdentifierSets {
                table: profile.table.name(),
                naming_column: profile
                    .table
                    .identifier_columns(&self.config.identifier_suffix)
                    .next(),
                columns: profile
                    .table
                    .identifier_columns(&self.config.identifier_suffix)
                    .map(|c| (c, profile.value_set(c)))
                    .collect(),
            })
            .collect();

        let pairs: Vec<(usize, usize)> = (0..sets.len())
            .flat_map(|s| (0..sets.len()).map(move |t| (s, t)))
            .filter(|(s, t)| s != t && sets[*s].table != sets[*t].table)
            .collect();

        #[cfg(feature = "parallel")]
        let per_pair: Vec<Vec<Relationship>> = pairs
            .par_iter()
            .map(|&(s, t)| contained_columns(&sets[s], &sets[t]))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let per_pair: Vec<Vec<Relationship>> = pairs
            .iter()
            .map(|&(s, t)| contained_columns(&sets[s], &sets[t]))
            .collect();

        let relationships: Vec<Relationship> = per_pair.into_iter().flatten().collect();
        for rel in &relationships {
            debug!("Proposed relationship {}", rel);
        }
        info!(
            "Discovered {} relationships across {} tables",
            relationships.len(),
            profiles.len()
        );
        relationships
    }
}

fn contained_columns(source: &IdentifierSets<'_>, target: &IdentifierSets<'_>) -> Vec<Relationship> {
    let mut found = Vec::new();
    for (c, source_values) in &source.columns {
        if source_values.is_empty() {
            continue;
        }
        for (d, target_values) in &target.columns {
            if c == d && target.naming_column != Some(*d) {
                continue;
            }
            if source_values.is_subset(target_values) {
                found.push(Relationship::new(
                    ColumnRef::new(source.table, *c),
                    ColumnRef::new(target.table, *d),
                ));
            }
        }
    }
    found
}
