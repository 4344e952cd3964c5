use serde_json::Value;

use super::{format_scalar, result_of};

/// Render as CSV: a `field,value` listing for an object, one row per
/// element for an array of objects.
pub fn render_csv(value: &Value) -> String {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    match result_of(value) {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([&format_scalar(other)]);
        }
    }

    wtr.into_inner()
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

fn write_array_csv(wtr: &mut csv::Writer<Vec<u8>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_object_as_field_value_rows() {
        let value = json!({"result": {"cm": "10000", "target_units": "Infinity"}});
        let out = render_csv(&value);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["field,value", "cm,10000", "target_units,∞"]);
    }

    #[test]
    fn test_array_of_objects() {
        let value = json!([{"name": "Cut", "share": "0.4"}, {"name": "Color", "share": "0.6"}]);
        let out = render_csv(&value);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["name,share", "Cut,0.4", "Color,0.6"]);
    }
}
