//! Shared utilities for CLI commands

use serde_json::Value;
use tabled::{Table, builder::Builder, settings::Style};

const MAX_CELL_WIDTH: usize = 40;

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

/// Parse a `key=value` filter argument
pub fn parse_filter(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", arg)),
    }
}

/// Format a JSON value for a table cell
pub fn format_cell(value: &Value) -> String {
    let text = match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate_with_ellipsis(&text, MAX_CELL_WIDTH)
}

/// Render list items as a table.
///
/// Columns are the object keys in order of first appearance. Items that are
/// not objects go into a single `value` column.
pub fn render_rows(items: &[Value]) -> String {
    let mut columns: Vec<String> = Vec::new();
    for item in items {
        match item {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
            _ => {
                if !columns.iter().any(|c| c == "value") {
                    columns.push("value".to_string());
                }
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());
    for item in items {
        let row = columns.iter().map(|column| match item {
            Value::Object(map) => map
                .get(column)
                .map(format_cell)
                .unwrap_or_else(|| "-".to_string()),
            other if column == "value" => format_cell(other),
            _ => "-".to_string(),
        });
        builder.push_record(row);
    }

    let mut table = builder.build();
    apply_table_style(&mut table);
    table.to_string()
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}
