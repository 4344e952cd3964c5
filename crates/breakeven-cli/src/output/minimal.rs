use serde_json::Value;

use super::{format_scalar, result_of};

/// Fields that answer "how much do I need to sell", in priority order.
const PRIORITY_KEYS: [&str; 5] = ["target_units", "bep_units", "p", "fc", "name"];

/// Just the headline number of the output.
pub fn render_minimal(value: &Value) -> String {
    let result_obj = result_of(value);

    if let Value::Object(map) = result_obj {
        if map.get("is_valid") == Some(&Value::Bool(false)) {
            return "invalid: price must exceed variable cost\n".to_string();
        }

        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format!("{}\n", format_scalar(val));
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}\n", key, format_scalar(val));
        }
    }

    if let Value::Array(items) = result_obj {
        let lines: Vec<String> = items.iter().map(format_scalar).collect();
        return format!("{}\n", lines.join("\n"));
    }

    format!("{}\n", format_scalar(result_obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_target_units() {
        let value = json!({"result": {"cm": "10000", "bep_units": "200", "target_units": "300", "is_valid": true}});
        assert_eq!(render_minimal(&value), "300\n");
    }

    #[test]
    fn test_unreachable_target() {
        let value = json!({"result": {"target_units": "Infinity", "is_valid": true}});
        assert_eq!(render_minimal(&value), "∞\n");
    }

    #[test]
    fn test_invalid_result() {
        let value = json!({"result": {"target_units": "0", "is_valid": false}});
        assert!(render_minimal(&value).starts_with("invalid"));
    }

    #[test]
    fn test_name_list() {
        assert_eq!(render_minimal(&json!(["a", "b"])), "a\nb\n");
    }
}
