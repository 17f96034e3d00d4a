//! Rule evaluation over classified files.
//!
//! Order is file-major, rule-minor, both in scan/registry order. Files are
//! checked in parallel; `collect` keeps the input order, so the result never
//! depends on which file finishes first. Each rule's globs and regexes are
//! compiled once per call and shared by all files.

use crate::checks::{run_check, CompiledCheck, Outcome};
use crate::error::CheckError;
use crate::models::file::ClassifiedFile;
use crate::models::rule::Rule;
use crate::models::Finding;
use glob::Pattern;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};

struct Prepared<'a> {
    rule: &'a Rule,
    paths: Vec<Pattern>,
    check: Result<CompiledCheck<'a>, CheckError>,
}

impl<'a> Prepared<'a> {
    fn new(rule: &'a Rule) -> Self {
        Self {
            rule,
            paths: rule.path_patterns(),
            check: CompiledCheck::compile(&rule.check),
        }
    }

    fn run(&self, content: &str) -> Result<Outcome, CheckError> {
        match &self.check {
            Ok(compiled) => compiled.run(content),
            // reproduce the compile error for this pair
            Err(_) => run_check(&self.rule.check, content),
        }
    }
}

/// Apply every applicable rule to every file.
///
/// Non-applicable pairs produce nothing; applicable pairs produce exactly one
/// finding, passed or failed.
pub fn evaluate(files: &[ClassifiedFile], rules: &[Rule]) -> Vec<Finding> {
    let prepared: Vec<Prepared> = rules.iter().map(Prepared::new).collect();
    files
        .par_iter()
        .map(|file| evaluate_file(file, &prepared))
        .collect::<Vec<Vec<Finding>>>()
        .into_iter()
        .flatten()
        .collect()
}

fn evaluate_file(file: &ClassifiedFile, rules: &[Prepared]) -> Vec<Finding> {
    rules
        .iter()
        .filter(|p| p.rule.applies_with(file, &p.paths))
        .map(|p| evaluate_pair(p.rule, file, |c| p.run(c)))
        .collect()
}

/// Run one check, turning faults (errors and panics) into a failed finding.
fn evaluate_pair<F>(rule: &Rule, file: &ClassifiedFile, check: F) -> Finding
where
    F: FnOnce(&str) -> Result<Outcome, CheckError>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(|| check(&file.content)))
        .unwrap_or_else(|payload| Err(CheckError::Panicked(panic_message(payload.as_ref()))));
    match result {
        Ok(Outcome::Pass) => Finding::pass(&rule.id, &file.path, rule.severity),
        Ok(Outcome::Fail(detail)) => Finding::fail(
            &rule.id,
            &file.path,
            rule.severity,
            rule.message.clone().unwrap_or(detail),
        ),
        Err(err) => {
            log::warn!("rule '{}' failed on {}: {}", rule.id, file.path, err);
            Finding::check_error(
                &rule.id,
                &file.path,
                rule.severity,
                format!("rule '{}' could not be checked: {}", rule.id, err),
            )
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
