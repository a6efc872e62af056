//! Typed access to a loose action parameter map

use fishbowl_domain::constants::DEFAULT_LIST_LIMIT;
use fishbowl_domain::utils::{clean_object, is_blank, is_truthy, scalar_to_string};
use fishbowl_domain::{FishbowlError, Record, Result};
use serde_json::Value;

/// Read-only view over the parameters of one action invocation.
///
/// Required accessors fail with `Missing required parameter: {key}` when the
/// key is absent, `null` or `""`. `0` and `false` count as supplied.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a>(&'a Record);

impl<'a> Params<'a> {
    pub const fn new(record: &'a Record) -> Self {
        Self(record)
    }

    /// Underlying parameter object.
    pub const fn record(&self) -> &'a Record {
        self.0
    }

    /// Value of `key` unless it is blank.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|value| !is_blank(value))
    }

    /// Value for `key`.
    ///
    /// # Errors
    /// `Validation` when the key is missing or blank.
    pub fn required(&self, key: &str) -> Result<&'a Value> {
        self.get(key).ok_or_else(|| missing(key))
    }

    /// Required identifier rendered for a URL path segment.
    pub fn required_id(&self, key: &str) -> Result<String> {
        let value = self.required(key)?;
        scalar_to_string(value).ok_or_else(|| {
            FishbowlError::Validation(format!("Parameter {key} must be a string or number"))
        })
    }

    /// String value for `key`; numbers are not coerced.
    pub fn required_str(&self, key: &str) -> Result<&'a str> {
        self.required(key)?
            .as_str()
            .ok_or_else(|| FishbowlError::Validation(format!("Parameter {key} must be a string")))
    }

    /// Boolean switch. Non-boolean values fall back to truthiness.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => default,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => is_truthy(other),
        }
    }

    /// Number, or `default` when absent or not numeric.
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).and_then(as_number).unwrap_or(default)
    }

    /// Nested object parameter (`additionalFields`, `filters`, ...); empty
    /// when absent.
    pub fn collection(&self, key: &str) -> Record {
        match self.0.get(key) {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Record::new(),
        }
    }

    /// [`Params::collection`] with blank values dropped.
    pub fn cleaned(&self, key: &str) -> Record {
        clean_object(&self.collection(key))
    }

    /// Array of objects; non-object entries are skipped.
    pub fn list(&self, key: &str) -> Vec<Record> {
        match self.0.get(key) {
            Some(Value::Array(items)) => {
                items.iter().filter_map(|item| item.as_object().cloned()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Page size for non-`returnAll` listings.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn limit(&self) -> usize {
        self.0
            .get("limit")
            .and_then(as_number)
            .filter(|limit| *limit >= 1.0)
            .map_or(DEFAULT_LIST_LIMIT, |limit| limit as usize)
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn missing(key: &str) -> FishbowlError {
    FishbowlError::Validation(format!("Missing required parameter: {key}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn zero_and_false_satisfy_required() {
        let record = record(json!({"qty": 0, "active": false, "name": ""}));
        let params = Params::new(&record);

        assert_eq!(params.required("qty").unwrap(), &json!(0));
        assert_eq!(params.required("active").unwrap(), &json!(false));
        assert_eq!(
            params.required("name").unwrap_err(),
            FishbowlError::Validation("Missing required parameter: name".into())
        );
    }

    #[test]
    fn ids_render_as_path_segments() {
        let record = record(json!({"partId": 42, "soId": "SO-1", "bad": {"id": 1}}));
        let params = Params::new(&record);

        assert_eq!(params.required_id("partId").unwrap(), "42");
        assert_eq!(params.required_id("soId").unwrap(), "SO-1");
        assert!(matches!(params.required_id("bad"), Err(FishbowlError::Validation(_))));
    }

    #[test]
    fn limit_defaults_and_accepts_numeric_strings() {
        let empty = Record::new();
        assert_eq!(Params::new(&empty).limit(), DEFAULT_LIST_LIMIT);

        let record = record(json!({"limit": "10"}));
        assert_eq!(Params::new(&record).limit(), 10);
    }

    #[test]
    fn collections_and_flags() {
        let record = record(json!({
            "additionalFields": {"note": "", "cost": 0},
            "returnAll": true,
            "byNumber": "yes"
        }));
        let params = Params::new(&record);

        assert_eq!(params.cleaned("additionalFields"), self::record(json!({"cost": 0})));
        assert!(params.collection("filters").is_empty());
        assert!(params.flag("returnAll", false));
        assert!(params.flag("byNumber", false));
        assert!(params.flag("missing", true));
    }
}
