//! Record and table printing.
//!
//! Actions describe what to show as columns over `Serialize` records; the
//! printer renders an aligned grid for lists and `label: value` lines for
//! single records. The global `--output json` switch bypasses the column
//! layout and dumps the records verbatim.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::client::{CliError, CliResult};

/// Output format selected per invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Aligned, human-readable tables and records.
    #[default]
    Table,
    /// Pretty-printed JSON of the underlying records.
    Json,
}

impl OutputFormat {
    /// Parse the `--output` option value.
    pub(crate) fn parse(value: &str) -> CliResult<Self> {
        match value {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(CliError::InvalidOption(format!(
                "unknown output format '{other}' (expected table or json)"
            ))),
        }
    }
}

struct Column {
    key: &'static str,
    label: &'static str,
    multiline: bool,
}

/// Column-oriented renderer for one action's output.
pub(crate) struct Printer {
    format: OutputFormat,
    header: Option<String>,
    columns: Vec<Column>,
}

impl Printer {
    pub(crate) fn new(format: OutputFormat) -> Self {
        Self {
            format,
            header: None,
            columns: Vec::new(),
        }
    }

    /// Title printed above table output.
    pub(crate) fn set_header(&mut self, text: &str) {
        self.header = Some(text.to_string());
    }

    pub(crate) fn add_column(&mut self, key: &'static str, label: &'static str) -> &mut Self {
        self.columns.push(Column {
            key,
            label,
            multiline: false,
        });
        self
    }

    /// A column whose value spans several lines in record output. Skipped
    /// in grid output.
    pub(crate) fn add_multiline_column(
        &mut self,
        key: &'static str,
        label: &'static str,
    ) -> &mut Self {
        self.columns.push(Column {
            key,
            label,
            multiline: true,
        });
        self
    }

    /// Print a list of records as a grid (or JSON).
    pub(crate) fn print_items<T: Serialize>(&self, items: &[T]) -> CliResult<()> {
        let values = to_values(items)?;
        match self.format {
            OutputFormat::Json => print_json(&Value::Array(values)),
            OutputFormat::Table => println!("{}", self.render_items(&values)),
        }
        Ok(())
    }

    /// Print a single record as `label: value` lines (or JSON).
    pub(crate) fn print_item<T: Serialize>(&self, item: &T) -> CliResult<()> {
        let value = serde_json::to_value(item).map_err(CliError::failure)?;
        match self.format {
            OutputFormat::Json => print_json(&value),
            OutputFormat::Table => println!("{}", self.render_item(&value)),
        }
        Ok(())
    }

    fn render_items(&self, items: &[Value]) -> String {
        let columns: Vec<&Column> = self.columns.iter().filter(|col| !col.multiline).collect();
        let mut widths: Vec<usize> = columns.iter().map(|col| col.label.len()).collect();
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(index, col)| {
                        let text = field_text(item, col.key);
                        widths[index] = widths[index].max(text.chars().count());
                        text
                    })
                    .collect()
            })
            .collect();

        let mut out = self.render_header();
        let heading: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(index, col)| pad(col.label, widths[index]))
            .collect();
        out.push_str(heading.join("  ").trim_end());
        out.push('\n');
        for row in rows {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(index, text)| pad(text, widths[index]))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    fn render_item(&self, item: &Value) -> String {
        let mut out = self.render_header();
        for col in &self.columns {
            let text = field_text(item, col.key);
            if col.multiline {
                out.push_str(col.label);
                out.push(':');
                out.push('\n');
                for line in text.lines().filter(|line| !line.is_empty()) {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }
            } else {
                out.push_str(&format!("{}: {text}\n", col.label));
            }
        }
        out.trim_end().to_string()
    }

    fn render_header(&self) -> String {
        self.header
            .as_ref()
            .map(|text| format!("{:=^60}\n", format!(" {text} ")))
            .unwrap_or_default()
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::debug!(error = %err, "failed to re-encode JSON output"),
    }
}

fn to_values<T: Serialize>(items: &[T]) -> CliResult<Vec<Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(CliError::failure))
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(padding))
}

/// Render one field of a record for display.
fn field_text(item: &Value, key: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| field_scalar(entry))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => field_scalar(other),
    }
}

fn field_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Server timestamps rendered the way the CLI shows dates everywhere.
pub(crate) fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y/%m/%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_output_format() {
        assert_eq!(OutputFormat::parse("table").expect("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("json").expect("json"), OutputFormat::Json);
        assert!(matches!(
            OutputFormat::parse("yaml"),
            Err(CliError::InvalidOption(_))
        ));
    }

    #[test]
    fn grid_aligns_columns_and_skips_multiline() {
        let mut printer = Printer::new(OutputFormat::Table);
        printer.set_header("Changeset List");
        printer
            .add_column("id", "ID")
            .add_column("name", "Name")
            .add_multiline_column("packages", "Packages");

        let rendered = printer.render_items(&[
            json!({"id": 1, "name": "nightly", "packages": "a\nb"}),
            json!({"id": 42, "name": "cs", "packages": ""}),
        ]);

        assert!(rendered.contains("Changeset List"));
        assert!(rendered.contains("ID  Name"));
        assert!(rendered.contains("1   nightly"));
        assert!(rendered.contains("42  cs"));
        assert!(!rendered.contains("Packages"));
    }

    #[test]
    fn record_output_indents_multiline_fields() {
        let mut printer = Printer::new(OutputFormat::Table);
        printer
            .add_column("name", "Name")
            .add_multiline_column("errata", "Errata");

        let rendered = printer.render_item(&json!({
            "name": "cs1",
            "errata": "RHSA-1\nRHSA-2"
        }));

        assert!(rendered.contains("Name: cs1"));
        assert!(rendered.contains("Errata:\n  RHSA-1\n  RHSA-2"));
    }

    #[test]
    fn absent_fields_render_empty_and_lists_join() {
        let item = json!({"environments": ["Dev", "QA"], "published": true});
        assert_eq!(field_text(&item, "environments"), "Dev, QA");
        assert_eq!(field_text(&item, "published"), "true");
        assert_eq!(field_text(&item, "description"), "");
    }
}
