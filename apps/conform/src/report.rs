//! Report builder: the immutable result of one run.

use crate::models::{Finding, Summary};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Findings in evaluation order plus their summary. Read-only once built.
pub struct Report {
    findings: Vec<Finding>,
    summary: Summary,
}

impl Report {
    /// Aggregate `findings` into a report.
    ///
    /// A report passes when no failed finding has `error` severity;
    /// warnings never change the outcome.
    pub fn build(findings: Vec<Finding>, files: usize, rules: usize) -> Self {
        let mut summary = Summary {
            total: findings.len(),
            files,
            rules,
            ..Summary::default()
        };
        for f in &findings {
            if f.passed {
                summary.passed += 1;
                continue;
            }
            summary.failed += 1;
            if f.is_blocking() {
                summary.errors += 1;
            } else {
                summary.warnings += 1;
            }
        }
        summary.passing = summary.errors == 0;
        Report { findings, summary }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn is_passing(&self) -> bool {
        self.summary.passing
    }

    /// Failed findings in report order.
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.passed)
    }

    /// Findings grouped by rule id.
    pub fn by_rule(&self) -> BTreeMap<&str, Vec<&Finding>> {
        let mut out: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
        for f in &self.findings {
            out.entry(f.rule.as_str()).or_default().push(f);
        }
        out
    }

    /// Findings grouped by file path.
    pub fn by_file(&self) -> BTreeMap<&str, Vec<&Finding>> {
        let mut out: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
        for f in &self.findings {
            out.entry(f.file.as_str()).or_default().push(f);
        }
        out
    }

    /// Process exit code: 0 when passing, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_passing() {
            0
        } else {
            1
        }
    }
}
