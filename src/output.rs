//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use tabled::{Table, Tabled};

use crate::Value;

/// Trait for human-readable output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

#[derive(Tabled)]
struct FieldRow {
    field: String,
    value: String,
}

impl PrettyPrint for Value {
    /// One row per top-level field. Nested values are shown as JSON.
    fn pretty_print(&self) -> String {
        let rows: Vec<FieldRow> = match self {
            Value::Mapping(map) => map
                .iter()
                .map(|(key, value)| FieldRow {
                    field: key.clone(),
                    value: value.to_display_string(),
                })
                .collect(),
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, value)| FieldRow {
                    field: i.to_string(),
                    value: value.to_display_string(),
                })
                .collect(),
            Value::Null => return "(empty response)".to_string(),
            scalar => vec![FieldRow {
                field: "value".to_string(),
                value: scalar.to_display_string(),
            }],
        };

        Table::new(rows).to_string()
    }
}
