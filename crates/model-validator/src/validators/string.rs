//! String validators.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::debug;

use super::{is_empty_value, within_bounds, Outcome, Params, Validator};

/// Resolve the string a validator should look at.
///
/// `null` reads as `""`. Empty values with `skipIfEmpty`, and non-string
/// values, are inapplicable.
fn subject<'v>(value: &'v Value, params: &Params) -> Result<&'v str, Outcome> {
    if params.skip_if_empty() && is_empty_value(value) {
        return Err(Outcome::Inapplicable);
    }
    match value {
        Value::Null => Ok(""),
        Value::String(s) => Ok(s),
        _ => Err(Outcome::Inapplicable),
    }
}

/// Presence of a non-blank string.
///
/// Params: `allowWhitespaces` (default `false`) accepts whitespace-only
/// strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRequired;

impl Validator for StringRequired {
    fn validate(&self, value: &Value, params: &Params, _data: &Value) -> Outcome {
        match value {
            Value::Null => Outcome::Violation,
            Value::String(s) if s.is_empty() => Outcome::Violation,
            Value::String(s) => {
                Outcome::from(params.flag("allowWhitespaces") || !s.trim().is_empty())
            }
            _ => Outcome::Inapplicable,
        }
    }

    fn name(&self) -> &str {
        "StringRequired"
    }
}

/// Substring presence.
///
/// Params: `searchString` (mandatory), `caseSensitive`, `skipIfEmpty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringContains;

impl Validator for StringContains {
    fn validate(&self, value: &Value, params: &Params, _data: &Value) -> Outcome {
        let Some(needle) = params.text("searchString") else {
            return Outcome::Inapplicable;
        };
        let haystack = match subject(value, params) {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        if params.flag("caseSensitive") {
            Outcome::from(haystack.contains(needle))
        } else {
            Outcome::from(haystack.to_lowercase().contains(&needle.to_lowercase()))
        }
    }

    fn name(&self) -> &str {
        "StringContains"
    }
}

/// Length in characters, inclusive `min`/`max`.
///
/// Params: `min`, `max`, `trim`, `skipIfEmpty`. With `trim` the emptiness
/// check also applies to the trimmed string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringLength;

impl Validator for StringLength {
    fn validate(&self, value: &Value, params: &Params, _data: &Value) -> Outcome {
        let s = match subject(value, params) {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        let s = if params.flag("trim") { s.trim() } else { s };
        if params.skip_if_empty() && s.is_empty() {
            return Outcome::Inapplicable;
        }
        within_bounds(s.chars().count() as f64, params)
    }

    fn name(&self) -> &str {
        "StringLength"
    }
}

fn full_match(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(case_insensitive)
        .build()
}

/// Compiled patterns keyed by source and case flag. Cleared when full.
type PatternCache = Mutex<HashMap<(String, bool), Regex>>;

const PATTERN_CACHE_LIMIT: usize = 256;

fn pattern_cache() -> &'static PatternCache {
    static CACHE: OnceLock<PatternCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn cached_pattern(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    let key = (pattern.to_string(), case_insensitive);
    let mut cache = pattern_cache()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(re) = cache.get(&key) {
        return Ok(re.clone());
    }
    let re = full_match(pattern, case_insensitive)?;
    if cache.len() >= PATTERN_CACHE_LIMIT {
        cache.clear();
    }
    cache.insert(key, re.clone());
    Ok(re)
}

/// Regular expression match against the whole string.
///
/// Params: `pattern` (mandatory), `flags` (`i` for case-insensitive),
/// `skipIfEmpty`. A missing or invalid pattern is inapplicable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringPattern;

impl Validator for StringPattern {
    fn validate(&self, value: &Value, params: &Params, _data: &Value) -> Outcome {
        let Some(pattern) = params.text("pattern") else {
            return Outcome::Inapplicable;
        };
        let s = match subject(value, params) {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        let case_insensitive = params.text("flags").is_some_and(|f| f.contains('i'));
        match cached_pattern(pattern, case_insensitive) {
            Ok(re) => Outcome::from(re.is_match(s)),
            Err(err) => {
                debug!(%pattern, error = %err, "invalid pattern");
                Outcome::Inapplicable
            }
        }
    }

    fn name(&self) -> &str {
        "StringPattern"
    }
}

const EMAIL_PATTERN: &str = concat!(
    r"[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
    r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
    r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+",
);

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| full_match(EMAIL_PATTERN, false).expect("email pattern compiles"))
}

/// Email address shape, a pattern check with a fixed pattern.
///
/// Params: `skipIfEmpty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Validator for Email {
    fn validate(&self, value: &Value, params: &Params, _data: &Value) -> Outcome {
        match subject(value, params) {
            Ok(s) => Outcome::from(email_regex().is_match(s)),
            Err(outcome) => outcome,
        }
    }

    fn name(&self) -> &str {
        "Email"
    }
}
