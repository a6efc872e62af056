//! Response envelope extraction
//!
//! Fishbowl wraps list data inconsistently: `{results: [..]}`,
//! `{<resource>s: [..]}`, a bare array, or a single object. Each endpoint
//! declares an ordered list of [`Extract`] strategies; the first one that
//! yields a value wins.

use fishbowl_domain::utils::is_truthy;
use serde_json::Value;

/// Where the items of a response live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extract {
    /// The response itself, when it is an array.
    BareArray,
    /// A named field, when it is truthy.
    Field(String),
    /// The whole response (unless `null`).
    Whole,
    /// Stop and yield nothing.
    Empty,
}

impl Extract {
    /// Shorthand for [`Extract::Field`].
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }
}

/// Apply `strategies` in order and flatten the winner into items.
///
/// Arrays contribute their elements; any other non-null value contributes
/// itself as a single item.
pub fn extract_items(response: &Value, strategies: &[Extract]) -> Vec<Value> {
    for strategy in strategies {
        let candidate = match strategy {
            Extract::BareArray => Some(response).filter(|value| value.is_array()),
            Extract::Field(name) => response.get(name.as_str()).filter(|value| is_truthy(value)),
            Extract::Whole => Some(response),
            Extract::Empty => return Vec::new(),
        };

        if let Some(value) = candidate {
            return flatten(value);
        }
    }
    Vec::new()
}

fn flatten(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}
