//! Interpreter for rule checks.
//!
//! `CompiledCheck` holds a `Check` with its regexes built, so a rule pays for
//! compilation once per run rather than once per file. Running it returns an
//! outcome, or a `CheckError` when the check itself cannot run (bad pattern,
//! unparseable JSON). Callers decide how faults are reported.

use crate::error::CheckError;
use crate::models::rule::Check;
use regex::Regex;
use serde_json::Value as Json;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a check that ran to completion.
pub enum Outcome {
    Pass,
    Fail(String),
}

/// Evaluate `check` against `content`.
pub fn run_check(check: &Check, content: &str) -> Result<Outcome, CheckError> {
    CompiledCheck::compile(check)?.run(content)
}

#[derive(Debug)]
/// A check with its patterns compiled once, reusable across files.
pub struct CompiledCheck<'a> {
    check: &'a Check,
    patterns: Vec<Regex>,
}

impl<'a> CompiledCheck<'a> {
    pub fn compile(check: &'a Check) -> Result<Self, CheckError> {
        let sources = match check {
            Check::RequireHeader { regex, .. }
            | Check::RequirePattern { regex }
            | Check::ForbidPattern { regex } => vec![regex.clone()],
            Check::RequireExport { symbol } => export_patterns(symbol),
            Check::ForbidImport { .. } => IMPORT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            Check::JsonField { .. } | Check::MaxLines { .. } => Vec::new(),
        };
        let patterns = sources
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { check, patterns })
    }

    /// Evaluate against one file's content.
    pub fn run(&self, content: &str) -> Result<Outcome, CheckError> {
        match self.check {
            Check::RequireHeader { regex, lines } => {
                let re = &self.patterns[0];
                if content.lines().take(*lines).any(|l| re.is_match(l)) {
                    Ok(Outcome::Pass)
                } else {
                    Ok(Outcome::Fail(format!(
                        "expected /{}/ within the first {} line(s)",
                        regex, lines
                    )))
                }
            }
            Check::RequirePattern { regex } => {
                if self.patterns[0].is_match(content) {
                    Ok(Outcome::Pass)
                } else {
                    Ok(Outcome::Fail(format!("expected /{}/ to match", regex)))
                }
            }
            Check::ForbidPattern { regex } => match self.patterns[0].find(content) {
                Some(m) => Ok(Outcome::Fail(format!(
                    "forbidden /{}/ found at line {}",
                    regex,
                    line_of(content, m.start())
                ))),
                None => Ok(Outcome::Pass),
            },
            Check::RequireExport { symbol } => {
                if self.patterns.iter().any(|re| re.is_match(content)) {
                    Ok(Outcome::Pass)
                } else if symbol == "default" {
                    Ok(Outcome::Fail("missing default export".to_string()))
                } else {
                    Ok(Outcome::Fail(format!("missing export '{}'", symbol)))
                }
            }
            Check::ForbidImport { modules } => {
                for (spec, offset) in imported_modules(&self.patterns, content) {
                    if let Some(m) = modules.iter().find(|m| module_matches(&spec, m)) {
                        return Ok(Outcome::Fail(format!(
                            "forbidden import '{}' (matches '{}') at line {}",
                            spec,
                            m,
                            line_of(content, offset)
                        )));
                    }
                }
                Ok(Outcome::Pass)
            }
            Check::JsonField { field, equals } => {
                let json: Json = serde_json::from_str(content)?;
                match lookup(&json, field) {
                    None => Ok(Outcome::Fail(format!("missing field '{}'", field))),
                    Some(actual) => match equals {
                        Some(expected) if actual != expected => Ok(Outcome::Fail(format!(
                            "field '{}' is {} (expected {})",
                            field, actual, expected
                        ))),
                        _ => Ok(Outcome::Pass),
                    },
                }
            }
            Check::MaxLines { max } => {
                let count = content.lines().count();
                if count > *max {
                    Ok(Outcome::Fail(format!(
                        "{} lines exceeds the limit of {}",
                        count, max
                    )))
                } else {
                    Ok(Outcome::Pass)
                }
            }
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, CheckError> {
    Regex::new(pattern).map_err(|source| CheckError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// 1-based line number of a byte offset.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// Any match means the module exports `symbol`.
fn export_patterns(symbol: &str) -> Vec<String> {
    if symbol == "default" {
        vec![
            r"(?m)^\s*export\s+default\b".to_string(),
            r"export\s*\{[^}]*\bas\s+default\b[^}]*\}".to_string(),
            r"(?m)^\s*module\.exports\s*=".to_string(),
        ]
    } else {
        let s = regex::escape(symbol);
        vec![
            format!(
                r"(?m)^\s*export\s+(?:declare\s+)?(?:async\s+)?(?:const|let|var|function\*?|class|type|interface|enum)\s+{}\b",
                s
            ),
            format!(r"export\s*\{{[^}}]*\b{}\b[^}}]*\}}", s),
            format!(r"(?m)^\s*(?:module\.)?exports\.{}\s*=", s),
        ]
    }
}

const IMPORT_PATTERNS: &[&str] = &[
    r#"(?m)^\s*(?:import|export)\s+(?:type\s+)?(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#,
    r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#,
    r#"\bimport\(\s*['"]([^'"]+)['"]\s*\)"#,
];

/// Module specifiers referenced by `import`/`export … from`/`require()`, with byte offsets.
fn imported_modules(patterns: &[Regex], content: &str) -> Vec<(String, usize)> {
    let mut found = Vec::new();
    for re in patterns {
        for caps in re.captures_iter(content) {
            if let Some(m) = caps.get(1) {
                found.push((m.as_str().to_string(), m.start()));
            }
        }
    }
    found.sort_by_key(|(_, offset)| *offset);
    found
}

fn module_matches(spec: &str, module: &str) -> bool {
    spec == module
        || spec
            .strip_prefix(module)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}

/// Resolve a dotted path (`a.b.0.c`) inside a JSON value.
fn lookup<'a>(json: &'a Json, field: &str) -> Option<&'a Json> {
    field.split('.').try_fold(json, |cur, seg| match cur {
        Json::Object(map) => map.get(seg),
        Json::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
