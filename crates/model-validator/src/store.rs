//! Data paired with its latest validation result.
//!
//! Every mutation goes through the store, which re-validates and then
//! notifies subscribers, so the result can never be stale relative to the
//! data it describes.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::ValidationEngine;
use crate::model::ValidationModel;
use crate::result::ValidationResult;

type Listener = Box<dyn FnMut(&Value, &ValidationResult) + Send>;

/// Handle returned by [`ValidatedStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct ValidatedStore {
    data: Value,
    model: Arc<ValidationModel>,
    engine: ValidationEngine,
    result: ValidationResult,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl ValidatedStore {
    /// Create a store and validate the initial data.
    pub fn new(data: Value, model: impl Into<Arc<ValidationModel>>) -> Self {
        Self::with_engine(data, model, ValidationEngine::default())
    }

    pub fn with_engine(
        data: Value,
        model: impl Into<Arc<ValidationModel>>,
        engine: ValidationEngine,
    ) -> Self {
        let model = model.into();
        let result = engine.run(&data, &model);
        Self {
            data,
            model,
            engine,
            result,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    pub fn model(&self) -> &Arc<ValidationModel> {
        &self.model
    }

    /// Mutate the data in place, then re-validate and notify.
    pub fn update<F>(&mut self, f: F) -> &ValidationResult
    where
        F: FnOnce(&mut Value),
    {
        f(&mut self.data);
        self.revalidate()
    }

    /// Replace the data wholesale, then re-validate and notify.
    pub fn replace(&mut self, data: Value) -> &ValidationResult {
        self.data = data;
        self.revalidate()
    }

    /// Swap the model, keeping the data.
    pub fn set_model(&mut self, model: impl Into<Arc<ValidationModel>>) -> &ValidationResult {
        self.model = model.into();
        self.revalidate()
    }

    /// Register a listener called after every re-validation, in
    /// subscription order.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Value, &ValidationResult) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn revalidate(&mut self) -> &ValidationResult {
        self.result = self.engine.run(&self.data, &self.model);
        for (_, listener) in &mut self.listeners {
            listener(&self.data, &self.result);
        }
        &self.result
    }
}

impl fmt::Debug for ValidatedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedStore")
            .field("data", &self.data)
            .field("level", &self.result.level)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
