//! Rule schema shared by the embedded rule table and project configs.
//!
//! A rule is plain data: an id, the roles (and optionally path globs) it
//! applies to, a severity, and a `check` table tagged by `kind`. Checks are
//! interpreted by `crate::checks`; there is no user-supplied code.
//!
//! ```toml
//! [[rules]]
//! id = "backend-default-export"
//! description = "Backend entry points export the app as default"
//! severity = "error"
//! roles = ["backend-route"]
//! [rules.check]
//! kind = "require_export"
//! symbol = "default"
//! ```

use super::file::{ClassifiedFile, FileRole};
use super::Severity;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A named declarative check with applicability and severity.
pub struct Rule {
    pub id: String,
    pub description: String,
    pub severity: Severity,
    pub roles: Vec<FileRole>,
    /// Optional globs on the root-relative path; any match makes the rule apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    /// Replaces the generated failure detail when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub check: Check,
}

impl Rule {
    /// Whether this rule targets `file`: role must be listed and, when
    /// `paths` is non-empty, at least one of `patterns` (from
    /// `path_patterns`) must match the path.
    pub fn applies_with(&self, file: &ClassifiedFile, patterns: &[Pattern]) -> bool {
        if !self.roles.contains(&file.role) {
            return false;
        }
        self.paths.is_empty() || patterns.iter().any(|p| p.matches(&file.path))
    }

    /// Compiled `paths` globs. Invalid globs are dropped; the registry
    /// rejects them up front.
    pub fn path_patterns(&self) -> Vec<Pattern> {
        self.paths
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Check kinds understood by the evaluator.
pub enum Check {
    /// Regex must match one of the first `lines` lines.
    RequireHeader {
        regex: String,
        #[serde(default = "default_header_lines")]
        lines: usize,
    },
    /// Regex must match somewhere in the file.
    RequirePattern { regex: String },
    /// Regex must not match anywhere in the file.
    ForbidPattern { regex: String },
    /// Module must export `symbol`; `default` means a default export.
    RequireExport { symbol: String },
    /// No import/require may target one of `modules` or a sub-path of one.
    ForbidImport { modules: Vec<String> },
    /// File must parse as JSON and carry `field` (dotted path), optionally equal to `equals`.
    JsonField {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        equals: Option<Json>,
    },
    /// File must not exceed `max` lines.
    MaxLines { max: usize },
}

fn default_header_lines() -> usize {
    5
}

impl Check {
    /// Regex sources carried by this check, for up-front validation.
    pub fn regexes(&self) -> Vec<&str> {
        match self {
            Check::RequireHeader { regex, .. }
            | Check::RequirePattern { regex }
            | Check::ForbidPattern { regex } => vec![regex.as_str()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
/// Per-rule adjustments from `[overrides.<id>]` in the project config.
pub struct RuleOverride {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(roles: Vec<FileRole>, paths: Vec<&str>) -> Rule {
        Rule {
            id: "r".into(),
            description: "d".into(),
            severity: Severity::Error,
            roles,
            paths: paths.into_iter().map(String::from).collect(),
            message: None,
            check: Check::MaxLines { max: 10 },
        }
    }

    #[test]
    fn test_applies_by_role_and_path() {
        let f = ClassifiedFile::new("web/package.json", FileRole::Config, "{}");
        let applies = |r: Rule| r.applies_with(&f, &r.path_patterns());
        assert!(applies(rule(vec![FileRole::Config], vec![])));
        assert!(!applies(rule(vec![FileRole::Schema], vec![])));
        assert!(applies(rule(vec![FileRole::Config], vec!["**/package.json"])));
        assert!(!applies(rule(vec![FileRole::Config], vec!["tsconfig.json"])));
    }

    #[test]
    fn test_check_deserializes_from_tagged_table() {
        let src = r#"
id = "x"
description = "pragma"
severity = "warning"
roles = ["frontend-component"]
[check]
kind = "require_header"
regex = "@jsxImportSource"
"#;
        let r: Rule = toml::from_str(src).unwrap();
        assert_eq!(r.severity, Severity::Warning);
        assert_eq!(
            r.check,
            Check::RequireHeader {
                regex: "@jsxImportSource".into(),
                lines: 5
            }
        );
        assert_eq!(r.check.regexes(), vec!["@jsxImportSource"]);
    }
}
