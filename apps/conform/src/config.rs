//! Configuration discovery and effective settings resolution.
//!
//! conform reads `conform.toml|yaml|yml` from the scanned root (or closest
//! ancestor, stopping at a `.git` directory) and merges it with CLI flags to
//! produce an `Effective` config. Defaults:
//! - `output`: `human`
//! - `permissive`: false
//! - `exclude`: empty
//! - no rule overrides, no extra rules
//!
//! Overrides precedence: CLI > config file > defaults. Exclude globs from
//! both sources are combined.

use crate::error::ConformError;
use crate::models::rule::{Rule, RuleOverride};
use crate::output::OutputMode;
use crate::registry::RuleRegistry;
use crate::scanner::ScanOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: &[&str] = &["conform.toml", "conform.yaml", "conform.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `conform.toml|yaml`.
pub struct ConformConfig {
    pub output: Option<OutputMode>,
    pub permissive: Option<bool>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub overrides: BTreeMap<String, RuleOverride>, // [overrides.<id>]
    #[serde(default)]
    pub rules: Vec<Rule>, // [[rules]] appended after the built-ins
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub output: OutputMode,
    pub permissive: bool,
    pub exclude: Vec<String>,
    pub overrides: BTreeMap<String, RuleOverride>,
    pub extra_rules: Vec<Rule>,
    /// Config file that was applied, if any.
    pub config_path: Option<PathBuf>,
}

impl Effective {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            permissive: self.permissive,
            exclude: self.exclude.clone(),
        }
    }

    /// Built-in rules plus project rules, with overrides applied.
    pub fn registry(&self) -> Result<RuleRegistry, ConformError> {
        Ok(RuleRegistry::builtin()?
            .with_extra(self.extra_rules.clone())?
            .apply_overrides(&self.overrides))
    }
}

/// Walk upward from `start` to find the directory holding the config file.
///
/// Stops at the first `conform.toml|yaml|yml` or `.git`; falls back to `start`.
/// Relative starts are resolved against the working directory first so the
/// walk can reach their ancestors.
pub fn detect_config_root(start: &Path) -> PathBuf {
    let start = absolute_start(start);
    let mut cur = start.as_path();
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.clone(),
        }
    }
}

fn absolute_start(start: &Path) -> PathBuf {
    if let Ok(p) = start.canonicalize() {
        return p;
    }
    if start.is_absolute() {
        return start.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(start))
        .unwrap_or_else(|_| start.to_path_buf())
}

/// Load the config in `dir` if one exists. Parse failures are errors.
pub fn load_config(dir: &Path) -> Result<Option<(PathBuf, ConformConfig)>, ConformError> {
    for name in CONFIG_NAMES {
        let p = dir.join(name);
        if p.is_file() {
            let cfg = load_config_file(&p)?;
            return Ok(Some((p, cfg)));
        }
    }
    Ok(None)
}

/// Parse an explicit config file; the extension picks TOML or YAML.
pub fn load_config_file(path: &Path) -> Result<ConformConfig, ConformError> {
    let config_err = |message: String| ConformError::Config {
        path: path.to_path_buf(),
        message,
    };
    let s = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s).map_err(|e| config_err(e.to_string()))
    } else {
        toml::from_str(&s).map_err(|e| config_err(e.to_string()))
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_config: Option<&str>,
    cli_output: Option<OutputMode>,
    cli_permissive: Option<bool>,
    cli_exclude: &[String],
) -> Result<Effective, ConformError> {
    let root = PathBuf::from(cli_root.unwrap_or("."));
    let loaded = match cli_config {
        Some(p) => {
            let p = PathBuf::from(p);
            let cfg = load_config_file(&p)?;
            Some((p, cfg))
        }
        None => load_config(&detect_config_root(&root))?,
    };
    let (config_path, cfg) = match loaded {
        Some((p, c)) => {
            log::debug!("using config {}", p.display());
            (Some(p), c)
        }
        None => (None, ConformConfig::default()),
    };

    let output = cli_output.or(cfg.output).unwrap_or_default();

    let permissive = cli_permissive.or(cfg.permissive).unwrap_or(false);

    let mut exclude = cfg.exclude;
    exclude.extend(cli_exclude.iter().cloned());

    Ok(Effective {
        root,
        output,
        permissive,
        exclude,
        overrides: cfg.overrides,
        extra_rules: cfg.rules,
        config_path,
    })
}
