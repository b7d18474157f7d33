//! Error types for model construction.

use thiserror::Error;

use crate::level::ViolationLevel;

/// Errors raised while building a model from its declarative form.
///
/// Validation itself never fails; these only concern loading models.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rule {address:?}: unknown validator {name:?}")]
    UnknownValidator { address: String, name: String },
    #[error("rule {address:?}: level {level} cannot be declared")]
    InvalidLevel {
        address: String,
        level: ViolationLevel,
    },
    #[error("rule {address:?}: aggregate declares no conditions")]
    EmptyAggregate { address: String },
}
