//! The validation engine.
//!
//! A pass walks the model in declaration order. For each rule it runs the
//! postvalidator (if any) against the result assembled so far, then resolves
//! the rule's address and runs every validator binding against every
//! resolved value. Unresolvable addresses land in `skipped`; inapplicable
//! outcomes bump `stats.total_skipped`. The pass itself never fails.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use model_validator_path::resolve;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::level::ViolationLevel;
use crate::model::{Active, CompiledRule, Rule, ValidatorBinding, ValidationModel};
use crate::result::ValidationResult;
use crate::validators::Outcome;

/// What to do when a user callback panics: a validator, postvalidator,
/// activation predicate or dynamic message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanicPolicy {
    /// Catch the panic. A check becomes inapplicable, an activation
    /// predicate reads as inactive and a message falls back to
    /// `Empty message, <address>`.
    #[default]
    Unresolved,
    /// Let the panic unwind out of the validation call.
    Propagate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub on_panic: PanicPolicy,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_panic(mut self, policy: PanicPolicy) -> Self {
        self.on_panic = policy;
        self
    }
}

/// Runs validation models against data. Holds no state between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine {
    options: EngineOptions,
}

impl ValidationEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Validate with default options.
    pub fn validate(data: &Value, model: &ValidationModel) -> ValidationResult {
        Self::default().run(data, model)
    }

    pub fn run(&self, data: &Value, model: &ValidationModel) -> ValidationResult {
        let clock = Instant::now();
        let mut result = ValidationResult::started();

        for compiled in model.iter() {
            self.run_rule(compiled, data, &mut result);
        }

        result.finish(clock.elapsed().as_secs_f64() * 1000.0);
        debug!(
            level = %result.level,
            rules = result.stats.processed_rules,
            errors = result.stats.total_errors,
            warnings = result.stats.total_warnings,
            notices = result.stats.total_notices,
            skipped = result.stats.total_skipped,
            "validation completed"
        );
        result
    }

    fn run_rule(&self, compiled: &CompiledRule, data: &Value, result: &mut ValidationResult) {
        let rule = &compiled.rule;
        let key = compiled.key.as_str();
        if rule.active.is_never() {
            trace!(rule = %key, "rule inactive");
            return;
        }
        let mut processed = matches!(rule.active, Active::Always(true));

        if let Some(postvalidator) = &rule.postvalidator {
            if self.is_active(key, rule, data, &Value::Null) {
                processed = true;
                let snapshot: &ValidationResult = result;
                match self.guard(key, || postvalidator(data, snapshot)) {
                    Some(true) => {}
                    Some(false) => {
                        let message = self.violation_message(None, rule, key, data, &Value::Null);
                        result.push(rule.effective_level(), key, message);
                    }
                    None => result.stats.total_skipped += 1,
                }
            }
        }

        if !rule.validators.is_empty() {
            match &compiled.address {
                Err(err) => {
                    if self.is_active(key, rule, data, &Value::Null) {
                        processed = true;
                        debug!(rule = %key, error = %err, "malformed address");
                        result.skip(compiled.key.clone(), err.to_string());
                    }
                }
                Ok(address) => {
                    let resolution = resolve(address, data);
                    for miss in resolution.misses {
                        if self.is_active(key, rule, data, &Value::Null) {
                            processed = true;
                            debug!(
                                rule = %key,
                                address = %miss.address,
                                segment = %miss.segment,
                                "path skipped"
                            );
                            result.skip(miss.address, miss.segment);
                        }
                    }
                    for target in resolution.targets {
                        if !self.is_active(&target.address, rule, data, target.value) {
                            continue;
                        }
                        processed = true;
                        for binding in &rule.validators {
                            self.run_binding(
                                binding,
                                rule,
                                &target.address,
                                target.value,
                                data,
                                result,
                            );
                        }
                    }
                }
            }
        }

        if processed {
            result.stats.processed_rules += 1;
        }
    }

    fn run_binding(
        &self,
        binding: &ValidatorBinding,
        rule: &Rule,
        address: &str,
        value: &Value,
        data: &Value,
        result: &mut ValidationResult,
    ) {
        result.stats.processed_validators += 1;
        let outcome = self
            .guard(address, || binding.validator.validate(value, &binding.params, data))
            .unwrap_or(Outcome::Inapplicable);
        trace!(%address, validator = binding.validator.name(), ?outcome, "validator ran");

        match outcome {
            Outcome::Pass => {}
            Outcome::Violation => {
                let level = binding
                    .level
                    .or(rule.level)
                    .unwrap_or(ViolationLevel::Error);
                let message = self.violation_message(Some(binding), rule, address, data, value);
                result.push(level, address, message);
            }
            Outcome::Inapplicable => result.stats.total_skipped += 1,
        }
    }

    /// A panicking activation predicate counts as inactive.
    fn is_active(&self, address: &str, rule: &Rule, data: &Value, value: &Value) -> bool {
        self.guard(address, || rule.active.eval(data, value)).unwrap_or(false)
    }

    /// Binding message, else rule message, else `Empty message, <address>`.
    /// A panicking dynamic message also falls back to the default text.
    fn violation_message(
        &self,
        binding: Option<&ValidatorBinding>,
        rule: &Rule,
        address: &str,
        data: &Value,
        value: &Value,
    ) -> String {
        binding
            .and_then(|b| b.message.as_ref())
            .or(rule.message.as_ref())
            .and_then(|message| self.guard(address, || message.render(data, value)))
            .unwrap_or_else(|| format!("Empty message, {address}"))
    }

    fn guard<T>(&self, address: &str, f: impl FnOnce() -> T) -> Option<T> {
        match self.options.on_panic {
            PanicPolicy::Propagate => Some(f()),
            PanicPolicy::Unresolved => match panic::catch_unwind(AssertUnwindSafe(f)) {
                Ok(value) => Some(value),
                Err(payload) => {
                    warn!(
                        %address,
                        reason = panic_reason(payload.as_ref()),
                        "callback panicked, falling back"
                    );
                    None
                }
            },
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Validate `data` against `model` with default options.
pub fn validate(data: &Value, model: &ValidationModel) -> ValidationResult {
    ValidationEngine::validate(data, model)
}
