//! Output formatter implementations.

use crate::operations::{BindMethod, BindReport, UnbindReport};
use crate::Result;

use super::{BindingRow, OutputFormatter};

/// Formatter for JSON output.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_rows(&self, rows: &[BindingRow]) -> Result<String> {
        Ok(serde_json::to_string_pretty(rows)?)
    }

    fn format_unbind(&self, report: &UnbindReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_bind(&self, report: &BindReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// Formatter for YAML output.
pub struct YamlFormatter;

impl OutputFormatter for YamlFormatter {
    fn format_rows(&self, rows: &[BindingRow]) -> Result<String> {
        Ok(serde_yaml::to_string(rows)?)
    }

    fn format_unbind(&self, report: &UnbindReport) -> Result<String> {
        Ok(serde_yaml::to_string(report)?)
    }

    fn format_bind(&self, report: &BindReport) -> Result<String> {
        Ok(serde_yaml::to_string(report)?)
    }
}

/// Formatter for human-readable output.
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_rows(&self, rows: &[BindingRow]) -> Result<String> {
        if rows.is_empty() {
            return Ok("No prims selected.".to_string());
        }

        let width = rows
            .iter()
            .map(|row| row.prim.to_string().len())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = rows
            .iter()
            .map(|row| {
                let prim = row.prim.to_string();
                match (&row.material, &row.owner, &row.relationship) {
                    (Some(material), Some(owner), Some(relationship)) => {
                        let strength = row.strength.unwrap_or_default();
                        format!("{prim:<width$}  {material}  ({owner}.{relationship}, {strength})")
                    }
                    _ => format!("{prim:<width$}  (unbound)"),
                }
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn format_unbind(&self, report: &UnbindReport) -> Result<String> {
        let mut lines = Vec::new();
        for key in &report.blocked {
            lines.push(format!("  blocked     {key}"));
        }
        for transfer in &report.transferred {
            let material = transfer
                .material
                .as_ref()
                .map_or_else(|| "(no material)".to_string(), ToString::to_string);
            lines.push(format!(
                "  transferred {material} from {} to {}",
                transfer.from, transfer.to
            ));
        }
        for exclusion in &report.excluded {
            lines.push(format!(
                "  excluded    {} from {}",
                exclusion.prim, exclusion.collection
            ));
        }

        let purposes: Vec<String> = report.purposes.iter().map(ToString::to_string).collect();
        let status = if report.success { "Unbound" } else { "Partially unbound" };
        let summary = if report.is_noop() {
            "Nothing to unbind.".to_string()
        } else {
            format!(
                "{status}: {} blocked, {} transferred, {} excluded in {} cycle(s) [{}]",
                report.blocked.len(),
                report.transferred.len(),
                report.excluded.len(),
                report.cycles,
                purposes.join(", ")
            )
        };
        lines.insert(0, summary);
        Ok(lines.join("\n"))
    }

    fn format_bind(&self, report: &BindReport) -> Result<String> {
        if report.bound.is_empty() {
            return Ok(format!("Nothing bound to {}.", report.material));
        }

        let status = if report.success { "Bound" } else { "Partially bound" };
        let mut lines = vec![format!(
            "{status} {} prim(s) to {} ({})",
            report.bound.len(),
            report.material,
            report.method
        )];
        if report.method == BindMethod::Collection {
            if let Some(collection) = &report.collection {
                lines.push(format!("  collection  {collection}"));
            }
        }
        for key in &report.relationships {
            lines.push(format!("  authored    {key}"));
        }
        Ok(lines.join("\n"))
    }
}
