use serde_json::Value;

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 依字元截斷，避免切在 UTF-8 中間
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool: {}", b),
        Value::Number(n) => format!("number: {}", n),
        Value::String(s) => {
            let len = s.chars().count();
            if len < 50 {
                format!("string: \"{}\"", s)
            } else {
                format!("string (len {}): \"{}...\"", len, truncate_chars(s, 47))
            }
        }
        Value::Array(a) => format!("array (len {})", a.len()),
        Value::Object(o) => format!(
            "object (keys: {})",
            o.keys().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        ),
    }
}
