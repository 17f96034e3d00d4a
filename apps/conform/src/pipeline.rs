//! One conformance run: Idle → Scanning → Evaluating → Reported.
//!
//! A `Pipeline` is consumed by `run`, so a finished run cannot be resumed
//! and every invocation starts from a fresh, independent state.

use crate::error::ConformError;
use crate::evaluator::evaluate;
use crate::registry::RuleRegistry;
use crate::report::Report;
use crate::scanner::{scan, ScanOptions};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Scanning,
    Evaluating,
    Reported,
}

pub struct Pipeline<'a> {
    registry: &'a RuleRegistry,
    options: ScanOptions,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a RuleRegistry, options: ScanOptions) -> Self {
        Self {
            registry,
            options,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {:?} after {:?}", next, self.stage);
        log::debug!("pipeline: {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    /// Scan `root`, evaluate the registry's rules and build the report.
    pub fn run(mut self, root: &Path) -> Result<Report, ConformError> {
        self.advance(Stage::Scanning);
        let files = scan(root, &self.options)?;

        self.advance(Stage::Evaluating);
        let rules = self.registry.list_rules();
        let findings = evaluate(&files, rules);

        self.advance(Stage::Reported);
        let report = Report::build(findings, files.len(), rules.len());
        let s = report.summary();
        log::info!(
            "checked {} file(s) against {} rule(s): {} passed, {} failed ({} error, {} warning)",
            s.files,
            s.rules,
            s.passed,
            s.failed,
            s.errors,
            s.warnings
        );
        Ok(report)
    }
}

/// Convenience wrapper running a fresh pipeline.
pub fn run(root: &Path, registry: &RuleRegistry, options: ScanOptions) -> Result<Report, ConformError> {
    Pipeline::new(registry, options).run(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FindingKind;
    use std::fs;
    use tempfile::tempdir;

    fn builtin() -> RuleRegistry {
        RuleRegistry::builtin().unwrap()
    }

    #[test]
    fn test_backend_route_missing_default_export_fails() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("backend")).unwrap();
        fs::write(
            dir.path().join("backend/index.ts"),
            "import { Hono } from 'hono';\nconst app = new Hono();\nexport const handler = app;\n",
        )
        .unwrap();

        let report = run(dir.path(), &builtin(), ScanOptions::default()).unwrap();
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].rule, "backend-default-export");
        assert_eq!(failures[0].file, "backend/index.ts");
        assert_eq!(failures[0].severity, crate::models::Severity::Error);
        assert!(!report.is_passing());
    }

    #[test]
    fn test_conforming_frontend_component_passes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("frontend")).unwrap();
        fs::write(
            dir.path().join("frontend/App.tsx"),
            "/** @jsxImportSource hono/jsx */\nimport { useState } from 'hono/jsx';\n\nexport default function App() {\n  return <div>hi</div>;\n}\n",
        )
        .unwrap();

        let report = run(dir.path(), &builtin(), ScanOptions::default()).unwrap();
        assert_eq!(report.failures().count(), 0);
        assert!(report.findings().iter().all(|f| f.file == "frontend/App.tsx"));
        assert!(report.is_passing());
    }

    #[test]
    fn test_no_applicable_rules_gives_empty_passing_report() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "# docs").unwrap();
        fs::write(dir.path().join("notes.txt"), "plain").unwrap();

        let report = run(dir.path(), &builtin(), ScanOptions::default()).unwrap();
        assert!(report.findings().is_empty());
        assert!(report.is_passing());
        assert_eq!(report.summary().files, 2);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("frontend/components")).unwrap();
        fs::create_dir_all(root.join("backend/routes")).unwrap();
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::write(root.join("frontend/components/Nav.tsx"), "import React from 'react';").unwrap();
        fs::write(root.join("frontend/components/Card.tsx"), "/** @jsxImportSource hono/jsx */").unwrap();
        fs::write(root.join("backend/routes/users.ts"), "import cors from 'cors';\nexport default r;").unwrap();
        fs::write(root.join("tests/users.test.ts"), "it.only('x', () => {});").unwrap();
        fs::write(root.join("package.json"), r#"{"name":"app"}"#).unwrap();

        let reg = builtin();
        let a = run(root, &reg, ScanOptions::default()).unwrap();
        let b = run(root, &reg, ScanOptions::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert!(!a.is_passing());
        let failed_rules: Vec<&str> = a.failures().map(|f| f.rule.as_str()).collect();
        assert_eq!(
            failed_rules,
            vec![
                "backend-no-forbidden-middleware",
                "frontend-jsx-import-source",
                "frontend-no-react-import",
                "config-package-module-type",
                "test-no-focused",
            ]
        );
    }

    #[test]
    fn test_malformed_package_json_is_contained() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{ nope").unwrap();
        fs::create_dir_all(dir.path().join("backend")).unwrap();
        fs::write(dir.path().join("backend/index.ts"), "export default app;").unwrap();

        let report = run(dir.path(), &builtin(), ScanOptions::default()).unwrap();
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FindingKind::RuleCheckError);
        assert_eq!(failures[0].file, "package.json");
        // warning-severity rule: the fault is reported but does not fail the run
        assert!(report.is_passing());
    }

    #[test]
    fn test_fatal_errors_abort() {
        let dir = tempdir().unwrap();
        let err = run(&dir.path().join("missing"), &builtin(), ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ConformError::Access { .. }));
        let err = run(dir.path(), &builtin(), ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ConformError::EmptyProject { .. }));
        let permissive = ScanOptions {
            permissive: true,
            exclude: Vec::new(),
        };
        assert!(run(dir.path(), &builtin(), permissive).unwrap().is_passing());
    }

    #[test]
    fn test_new_pipeline_starts_idle() {
        let reg = builtin();
        let p = Pipeline::new(&reg, ScanOptions::default());
        assert_eq!(p.stage(), Stage::Idle);
    }
}
