//! Numeric validators.

use serde_json::Value;

use super::{has_bounds, within_bounds, Outcome, Params, Validator};

/// Inclusive numeric range.
///
/// Params: `min`, `max`, `skipIfEmpty` (skips `null`). A `null` value
/// without `skipIfEmpty` violates any declared bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRange;

impl Validator for NumberRange {
    fn validate(&self, value: &Value, params: &Params, _data: &Value) -> Outcome {
        match value {
            Value::Null if params.skip_if_empty() => Outcome::Inapplicable,
            Value::Null => Outcome::from(!has_bounds(params)),
            Value::Number(n) => match n.as_f64() {
                Some(n) => within_bounds(n, params),
                None => Outcome::Inapplicable,
            },
            _ => Outcome::Inapplicable,
        }
    }

    fn name(&self) -> &str {
        "NumberRange"
    }
}
