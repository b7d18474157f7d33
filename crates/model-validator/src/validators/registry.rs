//! Name-keyed validator lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{
    ArrayLength, Email, NumberRange, StringContains, StringLength, StringPattern, StringRequired,
    Validator,
};

/// Maps stable identifiers to validators, so models can reference
/// validators by name (for example when loaded from JSON).
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the seven predefined validators, each registered
    /// under its plain name (`StringRequired`) and its prefixed alias
    /// (`ValidatorStringRequired`).
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [(&str, Arc<dyn Validator>); 7] = [
            ("StringRequired", Arc::new(StringRequired)),
            ("StringContains", Arc::new(StringContains)),
            ("StringLength", Arc::new(StringLength)),
            ("StringPattern", Arc::new(StringPattern)),
            ("Email", Arc::new(Email)),
            ("NumberRange", Arc::new(NumberRange)),
            ("ArrayLength", Arc::new(ArrayLength)),
        ];
        for (name, validator) in builtins {
            registry.insert_arc(format!("Validator{name}"), validator.clone());
            registry.insert_arc(name, validator);
        }
        registry
    }

    /// Register a validator, replacing any previous one with the same name.
    pub fn register<V>(&mut self, name: impl Into<String>, validator: V) -> &mut Self
    where
        V: Validator + 'static,
    {
        self.insert_arc(name, Arc::new(validator))
    }

    pub fn insert_arc(
        &mut self,
        name: impl Into<String>,
        validator: Arc<dyn Validator>,
    ) -> &mut Self {
        self.validators.insert(name.into(), validator);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Validator>> {
        self.validators.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &names)
            .finish()
    }
}
