//! Scanned project files and the roles they are classified into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural role inferred for a project file.
///
/// Variant order is the classification priority used by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileRole {
    BackendRoute,
    Schema,
    FrontendComponent,
    Config,
    Test,
    Other,
}

impl FileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileRole::BackendRoute => "backend-route",
            FileRole::Schema => "schema",
            FileRole::FrontendComponent => "frontend-component",
            FileRole::Config => "config",
            FileRole::Test => "test",
            FileRole::Other => "other",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A project file tagged with its role. Lives for the duration of one run.
pub struct ClassifiedFile {
    /// Path relative to the scanned root, `/`-separated.
    pub path: String,
    pub role: FileRole,
    pub content: String,
}

impl ClassifiedFile {
    pub fn new(path: impl Into<String>, role: FileRole, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role,
            content: content.into(),
        }
    }
}
