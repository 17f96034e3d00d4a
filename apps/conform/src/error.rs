//! Error types for the conformance pipeline.
//!
//! `ConformError` covers conditions that abort a run (the CLI maps them to
//! exit code 2). `CheckError` is raised by a single rule check and never
//! leaves the evaluator: it is turned into a failed finding.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop a run before a report is produced.
#[derive(Debug, Error)]
pub enum ConformError {
    #[error("cannot read project root '{}': {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no files found under '{}' (pass --permissive to accept an empty project)", path.display())]
    EmptyProject { path: PathBuf },

    #[error("invalid rule table: {0}")]
    Registry(String),

    #[error("invalid configuration in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid exclude pattern '{pattern}': {source}")]
    Exclude {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Internal failure of one rule while checking one file.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("content is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("check panicked: {0}")]
    Panicked(String),
}
