//! Python source emitters
//!
//! One module per generated artifact kind. Emitters return file bodies as
//! strings; the orchestrator decides paths and merge behaviour.

pub mod crud;
pub mod env;
pub mod init_files;
pub mod routes;
pub mod schemas;
pub mod tests_gen;

use serde_json::{Map, Value};

// ============================================================================
// Python literal rendering
// ============================================================================

/// Render a JSON value as a Python literal, matching `repr()` output:
/// single-quoted strings, `True`/`False`/`None`, `{'key': value}` dicts.
pub(crate) fn py_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                if n.as_i64().is_none() && n.as_u64().is_none() {
                    // Keep a decimal point so the literal stays a float
                    if f.fract() == 0.0 && f.is_finite() {
                        return format!("{f:.1}");
                    }
                    return format!("{f}");
                }
            }
            n.to_string()
        }
        Value::String(s) => py_str(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(py_literal).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => py_dict(map),
    }
}

/// Render a JSON object as a Python dict literal.
pub(crate) fn py_dict(map: &Map<String, Value>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{}: {}", py_str(k), py_literal(v)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Single-quoted Python string literal.
pub(crate) fn py_str(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_py_literal_scalars() {
        assert_eq!(py_literal(&json!(true)), "True");
        assert_eq!(py_literal(&json!(false)), "False");
        assert_eq!(py_literal(&json!(null)), "None");
        assert_eq!(py_literal(&json!(17)), "17");
        assert_eq!(py_literal(&json!(3.25)), "3.25");
        assert_eq!(py_literal(&json!("abc")), "'abc'");
    }

    #[test]
    fn test_py_literal_whole_float_keeps_decimal_point() {
        assert_eq!(py_literal(&json!(2.0)), "2.0");
    }

    #[test]
    fn test_py_str_escaping() {
        assert_eq!(py_str("it's"), "'it\\'s'");
        assert_eq!(py_str("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_py_dict_nested() {
        let value = json!({
            "id": 3,
            "is_active": true,
            "metadata": {"created_at": "2023-04-01"}
        });
        assert_eq!(
            py_literal(&value),
            "{'id': 3, 'is_active': True, 'metadata': {'created_at': '2023-04-01'}}"
        );
    }

    #[test]
    fn test_py_literal_array() {
        assert_eq!(py_literal(&json!(["a", 1])), "['a', 1]");
    }
}
