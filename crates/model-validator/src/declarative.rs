//! Serializable model declarations.
//!
//! Models built in code can hold arbitrary closures; this form trades that
//! for portability, so the same model can be stored, shipped and loaded at
//! runtime. Validators are referenced by registry name and aggregates are
//! limited to "no violations like these keys" conditions.
//!
//! ```
//! use model_validator::{validate, ModelSpec, ValidatorRegistry};
//! use serde_json::json;
//!
//! let spec = ModelSpec::from_value(json!({
//!     "name": {"validators": [{"validator": "StringRequired", "message": "Name is required"}]},
//!     "user_aggregate": {
//!         "message": "User data is invalid",
//!         "postvalidator": {"noErrorsLike": ["name"]}
//!     }
//! })).unwrap();
//! let model = spec.build(&ValidatorRegistry::builtin()).unwrap();
//! let result = validate(&json!({"name": ""}), &model);
//! assert_eq!(result.stats.total_errors, 2);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;
use crate::helpers::{count_errors_like, count_notices_like, count_warnings_like};
use crate::level::ViolationLevel;
use crate::model::{Rule, ValidationModel, ValidatorBinding};
use crate::result::ValidationResult;
use crate::validators::{Params, ValidatorRegistry};

/// Ordered address → rule declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSpec(pub IndexMap<String, RuleSpec>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<ViolationLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<BindingSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postvalidator: Option<AggregateSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BindingSpec {
    pub validator: String,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<ViolationLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Passes when no violation key contains any of the listed substrings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AggregateSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_errors_like: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_warnings_like: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_notices_like: Vec<String>,
}

impl AggregateSpec {
    fn is_empty(&self) -> bool {
        self.no_errors_like.is_empty()
            && self.no_warnings_like.is_empty()
            && self.no_notices_like.is_empty()
    }

    fn holds(&self, result: &ValidationResult) -> bool {
        self.no_errors_like.iter().all(|k| count_errors_like(k, result) == 0)
            && self.no_warnings_like.iter().all(|k| count_warnings_like(k, result) == 0)
            && self.no_notices_like.iter().all(|k| count_notices_like(k, result) == 0)
    }
}

fn declared_level(
    address: &str,
    level: Option<ViolationLevel>,
) -> Result<Option<ViolationLevel>, ModelError> {
    match level {
        Some(level @ (ViolationLevel::Unknown | ViolationLevel::None)) => {
            Err(ModelError::InvalidLevel {
                address: address.to_string(),
                level,
            })
        }
        other => Ok(other),
    }
}

impl ModelSpec {
    pub fn from_json_str(input: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve validator names against `registry` and build a model.
    pub fn build(&self, registry: &ValidatorRegistry) -> Result<ValidationModel, ModelError> {
        let mut model = ValidationModel::new();
        for (address, spec) in &self.0 {
            model.insert(address.clone(), spec.build(address, registry)?);
        }
        Ok(model)
    }
}

impl RuleSpec {
    fn build(&self, address: &str, registry: &ValidatorRegistry) -> Result<Rule, ModelError> {
        let mut rule = Rule::new();
        rule.level = declared_level(address, self.level)?;
        rule.message = self.message.clone().map(Into::into);
        if let Some(active) = self.active {
            rule = rule.active(active);
        }

        for binding in &self.validators {
            let validator =
                registry
                    .get(&binding.validator)
                    .ok_or_else(|| ModelError::UnknownValidator {
                        address: address.to_string(),
                        name: binding.validator.clone(),
                    })?;
            let mut bound = ValidatorBinding::from_arc(validator).params(binding.params.clone());
            bound.level = declared_level(address, binding.level)?;
            bound.message = binding.message.clone().map(Into::into);
            rule = rule.validator(bound);
        }

        if let Some(aggregate) = &self.postvalidator {
            if aggregate.is_empty() {
                return Err(ModelError::EmptyAggregate {
                    address: address.to_string(),
                });
            }
            let aggregate = aggregate.clone();
            rule = rule.postvalidator(move |_, result| aggregate.holds(result));
        }

        Ok(rule)
    }
}
