use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_scalar;

/// Field/value table for the result, followed by warnings and methodology.
pub fn render_table(value: &Value) -> String {
    let mut out = String::new();

    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                out.push_str(&render_value(result));
                if let Some(Value::Array(warnings)) = map.get("warnings") {
                    if !warnings.is_empty() {
                        out.push_str("\nWarnings:\n");
                        for w in warnings.iter().filter_map(Value::as_str) {
                            out.push_str(&format!("  - {}\n", w));
                        }
                    }
                }
                if let Some(Value::String(meth)) = map.get("methodology") {
                    out.push_str(&format!("\nMethodology: {}\n", meth));
                }
            }
            None => out.push_str(&render_value(value)),
        },
        other => out.push_str(&render_value(other)),
    }

    out
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                builder.push_record([key.as_str(), &format_cell(val)]);
            }
            format!("{}\n", Table::from(builder))
        }
        Value::Array(arr) => render_array(arr),
        other => format!("{}\n", format_scalar(other)),
    }
}

fn render_array(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(empty)\n".to_string();
    }

    let Some(Value::Object(first)) = arr.first() else {
        let lines: Vec<String> = arr.iter().map(format_cell).collect();
        return format!("{}\n", lines.join("\n"));
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    format!("{}\n", Table::from(builder))
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        other => format_scalar(other),
    }
}
