//! Project walk and file classification.
//!
//! Walks the tree in file-name order so results are stable across runs,
//! skips hidden directories and dependency/build folders, and tags each file
//! with a `FileRole`. The walk is read-only.

use crate::error::ConformError;
use crate::models::file::{ClassifiedFile, FileRole};
use glob::Pattern;
use std::fs;
use std::io;
use std::path::{Component, Path};
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist", "build"];
const SCRIPT_EXTS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];
const ENTRY_STEMS: &[&str] = &["index", "main", "server", "app"];
const CONFIG_EXTS: &[&str] = &["json", "jsonc", "toml", "yaml", "yml"];

#[derive(Debug, Clone, Default)]
/// Scan behaviour knobs resolved from CLI and config.
pub struct ScanOptions {
    /// Accept a project with no files instead of failing.
    pub permissive: bool,
    /// Globs on the root-relative path; matching files and directories are skipped.
    pub exclude: Vec<String>,
}

/// Walk `root` and classify every file found.
///
/// Fails with `Access` when `root` is not a readable directory and with
/// `EmptyProject` when nothing is found (unless `permissive`).
pub fn scan(root: &Path, opts: &ScanOptions) -> Result<Vec<ClassifiedFile>, ConformError> {
    let meta = fs::metadata(root).map_err(|source| ConformError::Access {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ConformError::Access {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "not a directory"),
        });
    }
    fs::read_dir(root).map_err(|source| ConformError::Access {
        path: root.to_path_buf(),
        source,
    })?;

    let excludes = opts
        .exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ConformError::Exclude {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e, root, &excludes));
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = relative_path(entry.path(), root);
        let bytes = match fs::read(entry.path()) {
            Ok(b) => b,
            Err(err) => {
                log::warn!("skipping unreadable file {}: {}", rel, err);
                continue;
            }
        };
        let role = classify(&rel);
        log::trace!("{} -> {}", rel, role);
        files.push(ClassifiedFile::new(
            rel,
            role,
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
    }

    if files.is_empty() {
        if opts.permissive {
            log::info!("no files under {}; continuing (permissive)", root.display());
        } else {
            return Err(ConformError::EmptyProject {
                path: root.to_path_buf(),
            });
        }
    }
    log::debug!("scanned {} file(s) under {}", files.len(), root.display());
    Ok(files)
}

fn is_skipped(entry: &DirEntry, root: &Path, excludes: &[Pattern]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() && (name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)) {
        return true;
    }
    if excludes.is_empty() {
        return false;
    }
    let rel = relative_path(entry.path(), root);
    excludes.iter().any(|p| p.matches(&rel))
}

/// Root-relative, `/`-separated path.
fn relative_path(path: &Path, root: &Path) -> String {
    let rel = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Infer the role of a root-relative path.
///
/// Heuristics are tried in priority order: backend-route, schema,
/// frontend-component, config, test, other.
pub fn classify(rel: &str) -> FileRole {
    let lower = rel.to_lowercase();
    let mut parts: Vec<&str> = lower.split('/').collect();
    let name = parts.pop().unwrap_or_default();
    let dirs = parts;
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    let in_dir = |names: &[&str]| dirs.iter().any(|d| names.contains(d));
    let is_script = SCRIPT_EXTS.contains(&ext.as_str());

    if in_dir(&["backend"]) && is_script && (ENTRY_STEMS.contains(&stem) || in_dir(&["routes", "api"]))
    {
        return FileRole::BackendRoute;
    }
    if name.contains("schema")
        || in_dir(&["schema", "schemas", "migrations"])
        || ext == "sql"
        || ext == "prisma"
    {
        return FileRole::Schema;
    }
    if in_dir(&["frontend"]) && (ext == "tsx" || ext == "jsx") {
        return FileRole::FrontendComponent;
    }
    if CONFIG_EXTS.contains(&ext.as_str())
        || name.contains(".config.")
        || (name.starts_with('.') && name.ends_with("rc"))
    {
        return FileRole::Config;
    }
    if in_dir(&["test", "tests", "__tests__"]) || name.contains(".test.") || name.contains(".spec.")
    {
        return FileRole::Test;
    }
    FileRole::Other
}
