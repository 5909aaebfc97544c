//! Structured output parsing
//!
//! Models asked for JSON still wrap it in markdown fences now and then. These
//! helpers peel the fences off, insist on a JSON object, and read fields
//! leniently: a missing or mistyped field yields `None` and the caller picks
//! the default.

use milesync_core::{CoachError, CoachResult, LlmError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Strip a surrounding ```` ```json ```` or ```` ``` ```` fence, if any.
pub fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + "```json".len()..];
        return match body.find("```") {
            Some(end) => body[..end].trim(),
            None => body.trim(),
        };
    }

    if let Some(start) = trimmed.find("```") {
        let body = &trimmed[start + 3..];
        return match body.find("```") {
            Some(end) => body[..end].trim(),
            None => body.trim(),
        };
    }

    trimmed
}

/// Parse completion text into a JSON object.
pub fn parse_json_object(text: &str) -> CoachResult<Map<String, Value>> {
    let block = extract_json_block(text);
    if block.is_empty() {
        return Err(malformed("empty completion"));
    }

    match serde_json::from_str::<Value>(block) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(malformed(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(malformed(format!("invalid JSON: {}", e))),
    }
}

fn malformed(reason: impl Into<String>) -> CoachError {
    CoachError::Llm(LlmError::MalformedOutput {
        reason: reason.into(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// LENIENT FIELD ACCESS
// ============================================================================

/// Non-empty string field.
pub fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integer field; numeric strings and floats are accepted (floats round).
pub fn int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    match map.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

/// Float field; numeric strings are accepted.
pub fn float_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Nested object field.
pub fn object_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

/// Array field; anything else reads as empty.
pub fn array_field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// List of non-empty strings. Scalars inside the list are stringified; a bare
/// string is treated as a one-element list.
pub fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// String-to-string map. Scalar values are stringified, others dropped.
pub fn string_map(map: &Map<String, Value>, key: &str) -> BTreeMap<String, String> {
    object_field(map, key)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
                .collect()
        })
        .unwrap_or_default()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_parse_never_panics(text in ".{0,200}") {
            let _ = parse_json_object(&text);
        }

        #[test]
        fn prop_fenced_object_parses(key in "[a-z]{1,8}", value in "[a-zA-Z ]{0,20}") {
            let mut obj = Map::new();
            obj.insert(key.clone(), Value::String(value.clone()));
            let body = Value::Object(obj).to_string();
            let fenced = format!("```json\n{}\n```", body);
            let map = parse_json_object(&fenced).unwrap();
            prop_assert_eq!(map.get(&key).and_then(Value::as_str), Some(value.as_str()));
        }
    }
}
