//! Relationship validation functionality
//!
//! Re-checks discovered relationships against the loaded tables and looks for
//! cycles in the table reference graph.

use std::collections::HashMap;
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};

use crate::inference::TableProfile;
use crate::models::{ColumnRef, Relationship};

/// A relationship that does not hold for the loaded data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipIssue {
    /// Source and target are the same table
    SelfReference(Relationship),
    /// A referenced table or column was not loaded
    UnknownColumn {
        relationship: Relationship,
        column: ColumnRef,
    },
    /// Some source value does not occur in the target
    NotContained(Relationship),
}

impl fmt::Display for RelationshipIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipIssue::SelfReference(rel) => {
                write!(f, "{rel} references its own table")
            }
            RelationshipIssue::UnknownColumn {
                relationship,
                column,
            } => write!(f, "{relationship} refers to unknown column {column}"),
            RelationshipIssue::NotContained(rel) => {
                write!(f, "{rel}: source values are not contained in the target")
            }
        }
    }
}

/// Result of relationship validation
#[derive(Debug, Default)]
pub struct RelationshipValidationResult {
    pub issues: Vec<RelationshipIssue>,
    /// Tables that reference each other, directly or through other tables
    pub cycles: Vec<Vec<String>>,
}

impl RelationshipValidationResult {
    pub fn is_sound(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Relationship validator
pub struct RelationshipValidator;

impl RelationshipValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        profiles: &[TableProfile<'_>],
        relationships: &[Relationship],
    ) -> RelationshipValidationResult {
        RelationshipValidationResult {
            issues: self.check_soundness(profiles, relationships),
            cycles: self.find_cycles(relationships),
        }
    }

    /// Verify every relationship links two different tables and that its
    /// source values are a subset of its target values.
    pub fn check_soundness(
        &self,
        profiles: &[TableProfile<'_>],
        relationships: &[Relationship],
    ) -> Vec<RelationshipIssue> {
        let by_name: HashMap<&str, &TableProfile<'_>> =
            profiles.iter().map(|p| (p.table.name(), p)).collect();

        let mut issues = Vec::new();
        for rel in relationships {
            if rel.source.table == rel.target.table {
                issues.push(RelationshipIssue::SelfReference(rel.clone()));
                continue;
            }

            let lookup = |column: &ColumnRef| {
                by_name
                    .get(column.table.as_str())
                    .filter(|p| p.column(&column.column).is_some())
                    .copied()
            };
            let (Some(source), Some(target)) = (lookup(&rel.source), lookup(&rel.target)) else {
                let column = if lookup(&rel.source).is_none() {
                    rel.source.clone()
                } else {
                    rel.target.clone()
                };
                issues.push(RelationshipIssue::UnknownColumn {
                    relationship: rel.clone(),
                    column,
                });
                continue;
            };

            let source_values = source.value_set(&rel.source.column);
            let target_values = target.value_set(&rel.target.column);
            if !source_values.is_subset(&target_values) {
                issues.push(RelationshipIssue::NotContained(rel.clone()));
            }
        }
        issues
    }

    /// Find groups of tables that reference each other.
    ///
    /// Each cycle lists its tables in first-seen order; groups come in
    /// first-seen order of their earliest table.
    pub fn find_cycles(&self, relationships: &[Relationship]) -> Vec<Vec<String>> {
        let mut graph = Graph::<&str, (), Directed>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

        for rel in relationships {
            let source = *node_map
                .entry(rel.source.table.as_str())
                .or_insert_with(|| graph.add_node(rel.source.table.as_str()));
            let target = *node_map
                .entry(rel.target.table.as_str())
                .or_insert_with(|| graph.add_node(rel.target.table.as_str()));
            graph.update_edge(source, target, ());
        }

        let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|mut component| {
                component.sort();
                component
            })
            .collect();
        components.sort_by_key(|component| component[0]);

        components
            .into_iter()
            .map(|component| {
                component
                    .into_iter()
                    .map(|node| graph[node].to_string())
                    .collect()
            })
            .collect()
    }
}

impl Default for RelationshipValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModellerConfig;
    use crate::import::MultiTableImporter;
    use crate::inference::TypeInferencer;

    fn rel(s: (&str, &str), t: (&str, &str)) -> Relationship {
        Relationship::new(ColumnRef::new(s.0, s.1), ColumnRef::new(t.0, t.1))
    }

    #[test]
    fn test_check_soundness_flags_each_issue_kind() {
        let config = ModellerConfig::default();
        let tables = MultiTableImporter::new(&config)
            .parse("CustomerID,Name\n1,Alice\n2,Bob\n\nOrderID,CustomerID\n10,1\n11,3")
            .unwrap();
        let types = TypeInferencer::new(&config);
        let profiles: Vec<TableProfile> = tables
            .values()
            .map(|t| TableProfile::new(t, types.infer_table(t)))
            .collect();

        let issues = RelationshipValidator::new().check_soundness(
            &profiles,
            &[
                rel(("Orders", "CustomerID"), ("Customers", "CustomerID")),
                rel(("Orders", "OrderID"), ("Orders", "OrderID")),
                rel(("Orders", "ShipperID"), ("Customers", "CustomerID")),
            ],
        );

        assert_eq!(issues.len(), 3);
        assert!(matches!(issues[0], RelationshipIssue::NotContained(_)));
        assert!(matches!(issues[1], RelationshipIssue::SelfReference(_)));
        assert!(matches!(
            &issues[2],
            RelationshipIssue::UnknownColumn { column, .. } if column.column == "ShipperID"
        ));
    }

    #[test]
    fn test_find_cycles_reports_mutual_references() {
        let validator = RelationshipValidator::new();
        let cycles = validator.find_cycles(&[
            rel(("Bs", "RefID"), ("As", "AID")),
            rel(("As", "AID"), ("Bs", "RefID")),
            rel(("Cs", "AID"), ("As", "AID")),
        ]);
        assert_eq!(cycles, vec![vec!["Bs".to_string(), "As".to_string()]]);
    }

    #[test]
    fn test_find_cycles_none_for_tree() {
        let validator = RelationshipValidator::new();
        let cycles = validator.find_cycles(&[
            rel(("Orders", "CustomerID"), ("Customers", "CustomerID")),
            rel(("Items", "OrderID"), ("Orders", "OrderID")),
        ]);
        assert!(cycles.is_empty());
    }
}
