//! Shared data models: severities, findings, rules and classified files.

pub mod file;
pub mod rule;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
/// Severity of a rule. Only `Error` failures make a run fail.
///
/// Config values go through `FromStr`, so `warn`/`err` are accepted too.
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(s: String) -> Result<Self, <Self as TryFrom<String>>::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Whether a finding comes from the check itself or from a check fault.
pub enum FindingKind {
    Check,
    RuleCheckError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Result of one applicable (rule, file) pair.
pub struct Finding {
    pub rule: String,
    pub file: String,
    pub severity: Severity,
    pub passed: bool,
    pub kind: FindingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Finding {
    pub fn pass(rule: &str, file: &str, severity: Severity) -> Self {
        Self {
            rule: rule.to_string(),
            file: file.to_string(),
            severity,
            passed: true,
            kind: FindingKind::Check,
            message: None,
        }
    }

    pub fn fail(rule: &str, file: &str, severity: Severity, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            file: file.to_string(),
            severity,
            passed: false,
            kind: FindingKind::Check,
            message: Some(message),
        }
    }

    pub fn check_error(rule: &str, file: &str, severity: Severity, message: String) -> Self {
        Self {
            kind: FindingKind::RuleCheckError,
            ..Self::fail(rule, file, severity, message)
        }
    }

    /// Failed with `error` severity, the only outcome that fails a run.
    pub fn is_blocking(&self) -> bool {
        !self.passed && self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Aggregated counts for a report.
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
    pub rules: usize,
    pub passing: bool,
}
