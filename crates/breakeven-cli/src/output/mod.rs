pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use breakeven_core::types::UNBOUNDED_LABEL;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    let rendered = match (format, value) {
        // Text reports print verbatim outside json.
        (OutputFormat::Json, _) => json::render_json(value),
        (_, Value::String(text)) => text.clone(),
        _ => render_structured(format, value),
    };
    print!("{}", rendered);
}

fn render_structured(format: &OutputFormat, value: &Value) -> String {
    match format {
        OutputFormat::Json => json::render_json(value),
        OutputFormat::Table => table::render_table(value),
        OutputFormat::Csv => csv_out::render_csv(value),
        OutputFormat::Minimal => minimal::render_minimal(value),
    }
}

/// Scalar rendering shared by the text formatters. Unreachable figures
/// arrive as the "Infinity" label and print as ∞.
pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) if s == UNBOUNDED_LABEL => "∞".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The "result" object of an envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}
