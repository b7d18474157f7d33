//! Read-only queries over a [`ValidationResult`].
//!
//! These are the building blocks for aggregate rules
//! (`count_errors_like("user.personalData", result) == 0`) and for UI state
//! (disabled buttons, per-field CSS classes, inline messages).

use std::fmt;

use regex::Regex;

use crate::level::ViolationLevel;
use crate::result::{ValidationResult, Violations};

/// Decides whether a violation key matches.
pub trait KeyMatcher {
    fn matches_key(&self, key: &str) -> bool;
}

/// Literal key.
impl KeyMatcher for str {
    fn matches_key(&self, key: &str) -> bool {
        self == key
    }
}

impl KeyMatcher for String {
    fn matches_key(&self, key: &str) -> bool {
        self.as_str() == key
    }
}

impl KeyMatcher for Regex {
    fn matches_key(&self, key: &str) -> bool {
        self.is_match(key)
    }
}

/// Owned key selector for callers that pick the match style at runtime.
#[derive(Debug, Clone)]
pub enum KeyPattern {
    Exact(String),
    Contains(String),
    Regex(Regex),
}

impl KeyMatcher for KeyPattern {
    fn matches_key(&self, key: &str) -> bool {
        match self {
            KeyPattern::Exact(exact) => exact == key,
            KeyPattern::Contains(part) => key.contains(part.as_str()),
            KeyPattern::Regex(re) => re.is_match(key),
        }
    }
}

fn count_like(map: &Violations, key: &str) -> usize {
    map.keys().filter(|address| address.contains(key)).count()
}

fn has_match<M: KeyMatcher + ?Sized>(map: &Violations, matcher: &M) -> bool {
    map.iter()
        .any(|(address, messages)| !messages.is_empty() && matcher.matches_key(address))
}

/// Number of error addresses containing `key` as a substring.
pub fn count_errors_like(key: &str, result: &ValidationResult) -> usize {
    count_like(&result.errors, key)
}

pub fn count_warnings_like(key: &str, result: &ValidationResult) -> usize {
    count_like(&result.warnings, key)
}

pub fn count_notices_like(key: &str, result: &ValidationResult) -> usize {
    count_like(&result.notices, key)
}

/// Whether any error address matching `key` has a message.
///
/// `key` is a literal address (`&str`), a [`Regex`], or a [`KeyPattern`].
pub fn has_error<M: KeyMatcher + ?Sized>(key: &M, result: &ValidationResult) -> bool {
    has_match(&result.errors, key)
}

pub fn has_warning<M: KeyMatcher + ?Sized>(key: &M, result: &ValidationResult) -> bool {
    has_match(&result.warnings, key)
}

pub fn has_notice<M: KeyMatcher + ?Sized>(key: &M, result: &ValidationResult) -> bool {
    has_match(&result.notices, key)
}

pub fn has_errors(result: &ValidationResult) -> bool {
    !result.errors.is_empty()
}

pub fn has_warnings(result: &ValidationResult) -> bool {
    !result.warnings.is_empty()
}

pub fn has_notices(result: &ValidationResult) -> bool {
    !result.notices.is_empty()
}

/// Severity token for styling a field or section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationClass {
    Error,
    Warning,
    Notice,
    Ok,
    Unknown,
}

impl ValidationClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationClass::Error => "error",
            ValidationClass::Warning => "warning",
            ValidationClass::Notice => "notice",
            ValidationClass::Ok => "ok",
            ValidationClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ValidationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `address` by the most severe matching violation.
///
/// With `exact` only the literal key counts; otherwise every key containing
/// `address` does, so a section address picks up its nested fields. A
/// missing result, or a pending one with nothing recorded, is `Unknown`.
pub fn get_validation_class(
    result: Option<&ValidationResult>,
    address: &str,
    exact: bool,
) -> ValidationClass {
    let Some(result) = result else {
        return ValidationClass::Unknown;
    };
    let pattern = if exact {
        KeyPattern::Exact(address.to_string())
    } else {
        KeyPattern::Contains(address.to_string())
    };

    if has_match(&result.errors, &pattern) {
        ValidationClass::Error
    } else if has_match(&result.warnings, &pattern) {
        ValidationClass::Warning
    } else if has_match(&result.notices, &pattern) {
        ValidationClass::Notice
    } else if result.is_completed() {
        ValidationClass::Ok
    } else {
        ValidationClass::Unknown
    }
}

/// Messages recorded at exactly `field`, for the requested levels in the
/// order given.
pub fn messages_for<'r>(
    result: &'r ValidationResult,
    field: &str,
    levels: &[ViolationLevel],
) -> Vec<&'r str> {
    levels
        .iter()
        .filter_map(|&level| result.violations(level))
        .filter_map(|map| map.get(field))
        .flat_map(|messages| messages.iter().map(String::as_str))
        .collect()
}

/// Messages at `field` across all levels, most severe first.
pub fn any_messages_for<'r>(result: &'r ValidationResult, field: &str) -> Vec<&'r str> {
    messages_for(result, field, &ViolationLevel::REPORTED)
}
