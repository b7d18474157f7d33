//! model-validator - model-level validation for JSON data.
//!
//! One data model, one validation model, one result. A [`ValidationModel`]
//! maps addresses (`user.personalData.name`, `addresses[*].zip`,
//! `titles[]`) to [`Rule`]s; [`validate`] runs every rule against the data
//! and returns a [`ValidationResult`] with messages grouped by severity and
//! address. Aggregate rules ([`Rule::postvalidator`]) inspect the result
//! assembled so far to express cross-field conditions.
//!
//! # Example
//!
//! ```
//! use model_validator::{
//!     count_errors_like, validate, Rule, StringLength, StringRequired, ValidationModel,
//!     ValidatorBinding, ViolationLevel,
//! };
//! use serde_json::json;
//!
//! let model = ValidationModel::new()
//!     .rule(
//!         "user.personalData.name",
//!         Rule::new()
//!             .validator(ValidatorBinding::new(StringRequired).message("Name is required"))
//!             .validator(
//!                 ValidatorBinding::new(StringLength)
//!                     .params(json!({"min": 4, "skipIfEmpty": true}))
//!                     .message("At least 4 characters, please"),
//!             ),
//!     )
//!     .rule(
//!         "personalDataSection",
//!         Rule::new()
//!             .message("Invalid personal data")
//!             .postvalidator(|_, result| count_errors_like("user.personalData", result) == 0),
//!     );
//!
//! let result = validate(&json!({"user": {"personalData": {"name": "Jo"}}}), &model);
//! assert_eq!(result.level, ViolationLevel::Error);
//! assert_eq!(result.errors["user.personalData.name"], vec!["At least 4 characters, please"]);
//! assert_eq!(result.errors["personalDataSection"], vec!["Invalid personal data"]);
//! ```

mod declarative;
mod engine;
mod error;
mod helpers;
mod level;
mod model;
mod result;
mod store;
pub mod validators;

pub use declarative::{AggregateSpec, BindingSpec, ModelSpec, RuleSpec};
pub use engine::{validate, EngineOptions, PanicPolicy, ValidationEngine};
pub use error::ModelError;
pub use helpers::{
    any_messages_for, count_errors_like, count_notices_like, count_warnings_like,
    get_validation_class, has_error, has_errors, has_notice, has_notices, has_warning,
    has_warnings, messages_for, KeyMatcher, KeyPattern, ValidationClass,
};
pub use level::{ParseLevelError, ViolationLevel};
pub use model::{
    Active, CompiledRule, Message, Postvalidator, Rule, ValidationModel, ValidatorBinding,
};
pub use model_validator_path::{Address, AddressError};
pub use result::{SkippedRule, ValidationResult, ValidationState, ValidationStats, Violations};
pub use store::{SubscriptionId, ValidatedStore};
pub use validators::{
    ArrayLength, Email, NumberRange, Outcome, Params, StringContains, StringLength,
    StringPattern, StringRequired, Validator, ValidatorRegistry,
};
