//! Output rendering for reports and the rule list.
//!
//! Supports `human` (default) and `json` outputs. The human form lists failed
//! findings followed by a summary line; the JSON form carries every finding,
//! passed or not, plus the summary.

use crate::models::rule::Rule;
use crate::models::{FindingKind, Severity};
use crate::report::Report;
use crate::utils::colors_enabled;
use owo_colors::OwoColorize;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value as JsonVal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
/// Output mode selected by `--output` or `output =` in the config.
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

fn use_colors(output: OutputMode) -> bool {
    output == OutputMode::Human && colors_enabled()
}

/// Print a report in the requested format.
pub fn print_report(report: &Report, output: OutputMode) {
    match output {
        OutputMode::Json => println!("{}", to_pretty(&compose_report_json(report))),
        OutputMode::Human => print!("{}", render_report_text(report, use_colors(output))),
    }
}

/// Print the active rules in registration order.
pub fn print_rules(rules: &[Rule], output: OutputMode) {
    match output {
        OutputMode::Json => println!("{}", to_pretty(&compose_rules_json(rules))),
        OutputMode::Human => {
            let color = use_colors(output);
            for r in rules {
                let roles = r
                    .roles
                    .iter()
                    .map(|role| role.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if color {
                    println!(
                        "{} {} [{}] — {}",
                        r.id.bold(),
                        severity_tag(r.severity, true),
                        roles,
                        r.description
                    );
                } else {
                    println!(
                        "{} {} [{}] — {}",
                        r.id,
                        severity_tag(r.severity, false),
                        roles,
                        r.description
                    );
                }
            }
        }
    }
}

fn to_pretty(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn severity_tag(sev: Severity, color: bool) -> String {
    match (sev, color) {
        (Severity::Error, true) => "⟦error⟧".red().bold().to_string(),
        (Severity::Warning, true) => "⟦warn⟧".yellow().bold().to_string(),
        (Severity::Error, false) => "⟦error⟧".to_string(),
        (Severity::Warning, false) => "⟦warn⟧".to_string(),
    }
}

/// Render failed findings and the summary line (pure, for tests).
pub fn render_report_text(report: &Report, color: bool) -> String {
    let mut out = String::new();
    for f in report.failures() {
        let icon = match (f.severity, color) {
            (Severity::Error, true) => "✖".red().to_string(),
            (Severity::Warning, true) => "▲".yellow().to_string(),
            (Severity::Error, false) => "✖".to_string(),
            (Severity::Warning, false) => "▲".to_string(),
        };
        let file = if color {
            f.file.clone().bold().to_string()
        } else {
            f.file.clone()
        };
        let rule = match f.kind {
            FindingKind::Check => f.rule.clone(),
            FindingKind::RuleCheckError => format!("{} (check error)", f.rule),
        };
        out.push_str(&format!(
            "{} {} {} ❲{}❳ — {}\n",
            icon,
            severity_tag(f.severity, color),
            file,
            rule,
            f.message.as_deref().unwrap_or("failed")
        ));
    }
    let s = report.summary();
    let verdict = if s.passing { "pass" } else { "fail" };
    let summary = format!(
        "— Summary — {} files={} rules={} checks={} passed={} errors={} warnings={}",
        verdict, s.files, s.rules, s.total, s.passed, s.errors, s.warnings
    );
    if color {
        out.push_str(&summary.bold().to_string());
    } else {
        out.push_str(&summary);
    }
    out.push('\n');
    out
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    let findings: Vec<_> = report
        .findings()
        .iter()
        .map(|f| {
            json!({
                "rule": f.rule,
                "file": f.file,
                "severity": f.severity,
                "passed": f.passed,
                "kind": f.kind,
                "message": f.message,
            })
        })
        .collect();
    json!({
        "findings": findings,
        "summary": report.summary(),
        "passing": report.is_passing(),
    })
}

/// Compose rule list JSON (pure).
pub fn compose_rules_json(rules: &[Rule]) -> JsonVal {
    json!({ "rules": rules })
}
