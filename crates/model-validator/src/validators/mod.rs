//! Validator functions.
//!
//! A validator judges one resolved value and answers with a tri-state
//! [`Outcome`]. The seven predefined validators read their options from
//! [`Params`] using the documented camelCase keys (`skipIfEmpty`, `min`,
//! `max`, ...). Any `Fn(&Value, &Params, &Value) -> Outcome` closure is a
//! validator too.

mod array;
mod number;
mod registry;
mod string;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use array::ArrayLength;
pub use number::NumberRange;
pub use registry::ValidatorRegistry;
pub use string::{Email, StringContains, StringLength, StringPattern, StringRequired};

/// Result of running one validator against one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No violation.
    Pass,
    /// The value violates the check.
    Violation,
    /// The validator declined to judge (empty value with `skipIfEmpty`,
    /// wrong value type, missing mandatory parameter).
    Inapplicable,
}

impl From<bool> for Outcome {
    fn from(ok: bool) -> Self {
        if ok {
            Outcome::Pass
        } else {
            Outcome::Violation
        }
    }
}

impl From<Option<bool>> for Outcome {
    fn from(ok: Option<bool>) -> Self {
        ok.map_or(Outcome::Inapplicable, Outcome::from)
    }
}

/// Validator options, a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Boolean option; absent or non-boolean reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn skip_if_empty(&self) -> bool {
        self.flag("skipIfEmpty")
    }
}

impl From<Value> for Params {
    /// Non-object values produce empty params.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Params(map),
            _ => Params::default(),
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params(map)
    }
}

/// A pure check over one value.
///
/// `data` is the whole document being validated, for cross-field checks.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value, params: &Params, data: &Value) -> Outcome;

    /// Identifier used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Validator for F
where
    F: Fn(&Value, &Params, &Value) -> Outcome + Send + Sync,
{
    fn validate(&self, value: &Value, params: &Params, data: &Value) -> Outcome {
        self(value, params, data)
    }
}

/// `null`, `""` and `[]` count as empty.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Inclusive `min`/`max` check shared by the length and range validators.
pub(crate) fn within_bounds(n: f64, params: &Params) -> Outcome {
    if let Some(min) = params.number("min") {
        if n < min {
            return Outcome::Violation;
        }
    }
    if let Some(max) = params.number("max") {
        if n > max {
            return Outcome::Violation;
        }
    }
    Outcome::Pass
}

fn has_bounds(params: &Params) -> bool {
    params.get("min").is_some() || params.get("max").is_some()
}
