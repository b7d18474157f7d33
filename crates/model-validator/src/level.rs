//! Violation levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a validation outcome, ordered least to most severe.
///
/// `Unknown` means validation has not completed; `None` means it ran and
/// found nothing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViolationLevel {
    #[default]
    Unknown,
    None,
    Notice,
    Warning,
    Error,
}

impl ViolationLevel {
    /// The three levels a rule or validator may be declared with.
    pub const REPORTED: [ViolationLevel; 3] = [
        ViolationLevel::Error,
        ViolationLevel::Warning,
        ViolationLevel::Notice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViolationLevel::Unknown => "unknown",
            ViolationLevel::None => "none",
            ViolationLevel::Notice => "notice",
            ViolationLevel::Warning => "warning",
            ViolationLevel::Error => "error",
        }
    }
}

impl fmt::Display for ViolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown violation level {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for ViolationLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(ViolationLevel::Unknown),
            "none" => Ok(ViolationLevel::None),
            "notice" => Ok(ViolationLevel::Notice),
            "warning" => Ok(ViolationLevel::Warning),
            "error" => Ok(ViolationLevel::Error),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}
