//! Validation models: rules keyed by address.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use model_validator_path::{Address, AddressError};
use serde_json::Value;

use crate::level::ViolationLevel;
use crate::result::ValidationResult;
use crate::validators::{Params, Validator};

type MessageFn = dyn Fn(&Value, &Value) -> String + Send + Sync;
type ActiveFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;

/// Aggregate check over the whole document and the result so far.
pub type Postvalidator = Arc<dyn Fn(&Value, &ValidationResult) -> bool + Send + Sync>;

/// Violation text, static or computed from `(data, value)`.
#[derive(Clone)]
pub enum Message {
    Static(String),
    Dynamic(Arc<MessageFn>),
}

impl Message {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> String + Send + Sync + 'static,
    {
        Message::Dynamic(Arc::new(f))
    }

    pub fn render(&self, data: &Value, value: &Value) -> String {
        match self {
            Message::Static(text) => text.clone(),
            Message::Dynamic(f) => f(data, value),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Static(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Static(text)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Message::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Whether a rule runs. The function form receives `(data, value)`.
#[derive(Clone)]
pub enum Active {
    Always(bool),
    When(Arc<ActiveFn>),
}

impl Active {
    pub fn when<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Active::When(Arc::new(f))
    }

    /// Statically disabled rules never evaluate anything.
    pub fn is_never(&self) -> bool {
        matches!(self, Active::Always(false))
    }

    pub fn eval(&self, data: &Value, value: &Value) -> bool {
        match self {
            Active::Always(on) => *on,
            Active::When(f) => f(data, value),
        }
    }
}

impl Default for Active {
    fn default() -> Self {
        Active::Always(true)
    }
}

impl From<bool> for Active {
    fn from(on: bool) -> Self {
        Active::Always(on)
    }
}

impl fmt::Debug for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Active::Always(on) => f.debug_tuple("Always").field(on).finish(),
            Active::When(_) => f.write_str("When(..)"),
        }
    }
}

/// One validator applied by a rule, with its own params and optional
/// level/message overrides.
#[derive(Clone)]
pub struct ValidatorBinding {
    pub validator: Arc<dyn Validator>,
    pub params: Params,
    pub level: Option<ViolationLevel>,
    pub message: Option<Message>,
}

impl ValidatorBinding {
    pub fn new<V>(validator: V) -> Self
    where
        V: Validator + 'static,
    {
        Self::from_arc(Arc::new(validator))
    }

    pub fn from_arc(validator: Arc<dyn Validator>) -> Self {
        Self {
            validator,
            params: Params::default(),
            level: None,
            message: None,
        }
    }

    pub fn params(mut self, params: impl Into<Params>) -> Self {
        self.params = params.into();
        self
    }

    pub fn level(mut self, level: ViolationLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for ValidatorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBinding")
            .field("validator", &self.validator.name())
            .field("params", &self.params)
            .field("level", &self.level)
            .field("message", &self.message)
            .finish()
    }
}

/// A validation rule bound to one address.
#[derive(Clone, Default)]
pub struct Rule {
    /// Level for violations whose binding declares none. Defaults to error.
    pub level: Option<ViolationLevel>,
    pub message: Option<Message>,
    pub active: Active,
    pub validators: Vec<ValidatorBinding>,
    pub postvalidator: Option<Postvalidator>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: ViolationLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn active(mut self, active: impl Into<Active>) -> Self {
        self.active = active.into();
        self
    }

    pub fn active_when<F>(self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.active(Active::when(f))
    }

    pub fn validator(mut self, binding: ValidatorBinding) -> Self {
        self.validators.push(binding);
        self
    }

    pub fn postvalidator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ValidationResult) -> bool + Send + Sync + 'static,
    {
        self.postvalidator = Some(Arc::new(f));
        self
    }

    pub fn effective_level(&self) -> ViolationLevel {
        self.level.unwrap_or(ViolationLevel::Error)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("level", &self.level)
            .field("message", &self.message)
            .field("active", &self.active)
            .field("validators", &self.validators)
            .field("postvalidator", &self.postvalidator.as_ref().map(|_| ".."))
            .finish()
    }
}

/// A rule together with its address, compiled at insertion.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub key: String,
    pub address: Result<Address, AddressError>,
    pub rule: Rule,
}

/// Rules keyed by address, kept in declaration order.
///
/// Declaration order matters: a postvalidator only sees violations
/// recorded by rules declared before it.
#[derive(Debug, Clone, Default)]
pub struct ValidationModel {
    rules: IndexMap<String, CompiledRule>,
}

impl ValidationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.insert(key, rule);
        self
    }

    /// Add or replace the rule for `key`. A replaced rule keeps its
    /// original position.
    pub fn insert(&mut self, key: impl Into<String>, rule: Rule) -> Option<Rule> {
        let key = key.into();
        let address = Address::parse(&key);
        self.rules
            .insert(
                key.clone(),
                CompiledRule {
                    key,
                    address,
                    rule,
                },
            )
            .map(|old| old.rule)
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key).map(|compiled| &compiled.rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
