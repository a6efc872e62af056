//! JSON object helpers shared by every resource mapper

use serde_json::Value;

use crate::errors::{FishbowlError, Result};
use crate::types::Record;

/// Drop keys whose value is `null` or an empty string.
///
/// `0` and `false` are meaningful to Fishbowl and are kept.
pub fn clean_object(record: &Record) -> Record {
    record
        .iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// `null` or `""`: the values `clean_object` drops and required-parameter
/// checks reject.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Loose truthiness used when deciding whether an optional field was
/// supplied: `null`, `false`, `0` and `""` are falsy; arrays and objects are
/// always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Field value if present and truthy.
pub fn truthy<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|value| is_truthy(value))
}

/// `{"id": value}` reference object.
pub fn reference(id: &Value) -> Value {
    let mut object = Record::new();
    object.insert("id".to_string(), id.clone());
    Value::Object(object)
}

/// Replace `{id_key}` with `{target}: {"id": ..}` when the id is truthy.
///
/// Mirrors the common "flatten an id parameter into a nested reference"
/// shape Fishbowl expects for locations, carriers, groups and so on.
pub fn nest_reference(body: &mut Record, source: &Record, id_key: &str, target: &str) {
    if let Some(id) = truthy(source, id_key) {
        body.insert(target.to_string(), reference(id));
        body.remove(id_key);
    }
}

/// Fail with `Missing required parameter: {field}` for the first field that
/// is absent, `null` or `""`.
pub fn validate_required(params: &Record, required: &[&str]) -> Result<()> {
    for field in required {
        if params.get(*field).map_or(true, is_blank) {
            return Err(FishbowlError::Validation(format!("Missing required parameter: {field}")));
        }
    }
    Ok(())
}

/// Render a query map as ordered string pairs. `null` entries are skipped,
/// arrays are comma-joined and nested objects are sent as JSON text.
pub fn query_pairs(query: &Record) -> Vec<(String, String)> {
    query
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), query_value(value)))
        .collect()
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(query_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Textual form of a scalar id, for path segments.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
