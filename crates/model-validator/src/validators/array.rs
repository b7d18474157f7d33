//! Array validators.

use serde_json::Value;

use super::{within_bounds, Outcome, Params, Validator};

/// Inclusive bounds on element count.
///
/// Params: `min`, `max`, `skipIfEmpty` (skips zero-length arrays and
/// `null`). A `null` value without `skipIfEmpty` counts as zero elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayLength;

impl Validator for ArrayLength {
    fn validate(&self, value: &Value, params: &Params, _data: &Value) -> Outcome {
        let len = match value {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => return Outcome::Inapplicable,
        };
        if len == 0 && params.skip_if_empty() {
            return Outcome::Inapplicable;
        }
        within_bounds(len as f64, params)
    }

    fn name(&self) -> &str {
        "ArrayLength"
    }
}
