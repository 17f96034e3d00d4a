//! conform core library.
//!
//! This crate checks a project tree against declarative guideline rules:
//! files are scanned and classified by role, applicable rules are evaluated
//! per file, and the findings are aggregated into an immutable report.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `registry`: The ordered, validated rule table.
//! - `scanner`: Tree walk and file classification.
//! - `checks`: Interpreter for rule check kinds.
//! - `evaluator`: Applies rules to files with fault isolation.
//! - `report`: Aggregation into the final report.
//! - `pipeline`: One run from scan to report.
//! - `models`: Data models for rules, files and findings.
//! - `output`: Human/JSON printers.
//! - `error`: Error types.
//! - `utils`: Supporting helpers.
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod utils;

pub use error::{CheckError, ConformError};
pub use models::file::{ClassifiedFile, FileRole};
pub use models::rule::{Check, Rule};
pub use models::{Finding, Severity};
pub use pipeline::{run, Pipeline};
pub use registry::RuleRegistry;
pub use report::Report;
