//! Run report rendering

use super::ExportError;
use crate::models::{ConstraintOutcome, RunReport};

/// Output format for a [`RunReport`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            _ => Err(format!(
                "Invalid report format: {}. Expected: text, json, yaml",
                s
            )),
        }
    }
}

/// Renders run reports for printing or logging
pub struct ReportExporter;

impl ReportExporter {
    pub fn render(report: &RunReport, format: ReportFormat) -> Result<String, ExportError> {
        match format {
            ReportFormat::Text => Ok(Self::render_text(report)),
            ReportFormat::Json => serde_json::to_string_pretty(report)
                .map_err(|e| ExportError::SerializationError(e.to_string())),
            ReportFormat::Yaml => serde_yaml::to_string(report)
                .map_err(|e| ExportError::SerializationError(e.to_string())),
        }
    }

    fn render_text(report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str("Created tables:\n");
        for table in &report.tables {
            output.push_str(&format!("- {}\n", table));
        }

        output.push_str("\nIdentified relationships:\n");
        if report.relationships.is_empty() {
            output.push_str("(none)\n");
        }
        for relationship in &report.relationships {
            output.push_str(&format!("- {}\n", relationship));
        }

        if !report.constraints.is_empty() {
            output.push_str(&format!(
                "\nConstraints: {} applied, {} skipped\n",
                report.applied_constraints(),
                report.constraints.len() - report.applied_constraints()
            ));
            for result in &report.constraints {
                if let ConstraintOutcome::Skipped { reason } = &result.outcome {
                    output.push_str(&format!("- skipped {}: {}\n", result.constraint_name, reason));
                }
            }
        }

        if !report.warnings.is_empty() {
            output.push_str("\nWarnings:\n");
            for warning in &report.warnings {
                output.push_str(&format!("- {}\n", warning));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnRef, ConstraintResult, Relationship};

    fn report() -> RunReport {
        let rel = Relationship::new(
            ColumnRef::new("Orders", "CustomerID"),
            ColumnRef::new("Customers", "CustomerID"),
        );
        let mut report = RunReport::new(
            vec!["Customers".to_string(), "Orders".to_string()],
            vec![rel.clone()],
        );
        report.constraints.push(ConstraintResult {
            constraint_name: rel.constraint_name(),
            relationship: rel,
            outcome: ConstraintOutcome::Skipped {
                reason: "unsupported".to_string(),
            },
        });
        report
    }

    #[test]
    fn test_render_text_lists_tables_then_relationships() {
        let text = ReportExporter::render(&report(), ReportFormat::Text).unwrap();
        assert!(text.starts_with("Created tables:\n- Customers\n- Orders\n"));
        assert!(text.contains("- Orders.CustomerID -> Customers.CustomerID\n"));
        assert!(text.contains("0 applied, 1 skipped"));
    }

    #[test]
    fn test_render_json() {
        let json = ReportExporter::render(&report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tables"][1], "Orders");
        assert_eq!(value["constraints"][0]["outcome"]["status"], "skipped");
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("YAML".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
