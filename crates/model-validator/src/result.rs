//! Validation result structure.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::level::ViolationLevel;

/// Messages per address, in first-insertion order.
pub type Violations = IndexMap<String, Vec<String>>;

/// Lifecycle of a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    /// Not run yet, or still being assembled (what postvalidators see).
    #[default]
    Pending,
    Completed,
}

/// A rule whose address did not resolve against the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRule {
    pub address: String,
    /// First segment that does not exist, or the parse error for a
    /// malformed address.
    pub segment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Elapsed milliseconds.
    pub time: f64,
    pub processed_rules: usize,
    pub processed_validators: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_notices: usize,
    pub total_skipped: usize,
}

impl Default for ValidationStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            time: 0.0,
            processed_rules: 0,
            processed_validators: 0,
            total_errors: 0,
            total_warnings: 0,
            total_notices: 0,
            total_skipped: 0,
        }
    }
}

/// Outcome of one validation pass.
///
/// Produced fresh by every call to the engine. The default value is a
/// pending result with level `unknown`, useful as a placeholder before the
/// first run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub state: ValidationState,
    pub level: ViolationLevel,
    pub stats: ValidationStats,
    pub errors: Violations,
    pub warnings: Violations,
    pub notices: Violations,
    pub skipped: Vec<SkippedRule>,
}

impl ValidationResult {
    pub(crate) fn started() -> Self {
        Self::default()
    }

    pub fn is_completed(&self) -> bool {
        self.state == ValidationState::Completed
    }

    /// The violation map for one of the reported levels.
    ///
    /// `Unknown` and `None` have no map.
    pub fn violations(&self, level: ViolationLevel) -> Option<&Violations> {
        match level {
            ViolationLevel::Error => Some(&self.errors),
            ViolationLevel::Warning => Some(&self.warnings),
            ViolationLevel::Notice => Some(&self.notices),
            ViolationLevel::Unknown | ViolationLevel::None => None,
        }
    }

    /// Record one message and bump the matching total.
    pub(crate) fn push(&mut self, level: ViolationLevel, address: &str, message: String) {
        let (map, total) = match level {
            ViolationLevel::Error => (&mut self.errors, &mut self.stats.total_errors),
            ViolationLevel::Warning => (&mut self.warnings, &mut self.stats.total_warnings),
            ViolationLevel::Notice => (&mut self.notices, &mut self.stats.total_notices),
            // Placeholder levels are recorded as errors.
            ViolationLevel::Unknown | ViolationLevel::None => {
                (&mut self.errors, &mut self.stats.total_errors)
            }
        };
        map.entry(address.to_string()).or_default().push(message);
        *total += 1;
    }

    pub(crate) fn skip(&mut self, address: String, segment: String) {
        self.skipped.push(SkippedRule { address, segment });
        self.stats.total_skipped += 1;
    }

    /// Highest level with at least one message, or `None`.
    pub fn observed_level(&self) -> ViolationLevel {
        ViolationLevel::REPORTED
            .into_iter()
            .find(|&level| self.violations(level).is_some_and(|map| !map.is_empty()))
            .unwrap_or(ViolationLevel::None)
    }

    pub(crate) fn finish(&mut self, elapsed_ms: f64) {
        self.stats.finished_at = Some(Utc::now());
        self.stats.time = elapsed_ms;
        self.level = self.observed_level();
        self.state = ValidationState::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_pending_unknown() {
        let result = ValidationResult::default();
        assert_eq!(result.state, ValidationState::Pending);
        assert_eq!(result.level, ViolationLevel::Unknown);
        assert!(!result.is_completed());
    }

    #[test]
    fn push_groups_by_address_in_order() {
        let mut result = ValidationResult::started();
        result.push(ViolationLevel::Error, "name", "required".into());
        result.push(ViolationLevel::Warning, "surname", "short".into());
        result.push(ViolationLevel::Error, "name", "too short".into());
        result.push(ViolationLevel::Error, "age", "range".into());
        assert_eq!(result.errors["name"], vec!["required", "too short"]);
        let keys: Vec<&String> = result.errors.keys().collect();
        assert_eq!(keys, vec!["name", "age"]);
        assert_eq!(result.stats.total_errors, 3);
        assert_eq!(result.stats.total_warnings, 1);
        assert_eq!(result.observed_level(), ViolationLevel::Error);
    }

    #[test]
    fn finish_computes_level() {
        let mut result = ValidationResult::started();
        result.finish(0.5);
        assert_eq!(result.level, ViolationLevel::None);
        assert!(result.is_completed());

        let mut result = ValidationResult::started();
        result.push(ViolationLevel::Notice, "surname", "recommended".into());
        result.finish(0.5);
        assert_eq!(result.level, ViolationLevel::Notice);
    }

    #[test]
    fn serializes_documented_shape() {
        let mut result = ValidationResult::started();
        result.push(ViolationLevel::Error, "personalData.name", "Name is required".into());
        result.skip("form.users.data".into(), "users".into());
        result.finish(0.25);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["state"], json!("completed"));
        assert_eq!(json["level"], json!("error"));
        assert_eq!(json["errors"], json!({"personalData.name": ["Name is required"]}));
        assert_eq!(json["warnings"], json!({}));
        assert_eq!(json["skipped"], json!([{"address": "form.users.data", "segment": "users"}]));
        assert_eq!(json["stats"]["total_skipped"], json!(1));
        assert_eq!(json["stats"]["time"], json!(0.25));
        let back: ValidationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
