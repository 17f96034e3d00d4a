//! Rule registry: the ordered, validated rule table for one run.
//!
//! The built-in table is embedded from `rules/builtin.toml`. Project configs
//! may append rules (`[[rules]]`) and adjust existing ones
//! (`[overrides.<id>]`). Registration order is the report tie-break order.

use crate::error::ConformError;
use crate::models::rule::{Rule, RuleOverride};
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

const BUILTIN_RULES: &str = include_str!("../rules/builtin.toml");

#[derive(Deserialize)]
struct RuleTable {
    #[serde(default)]
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// Registry holding the embedded built-in rules.
    pub fn builtin() -> Result<Self, ConformError> {
        Self::from_toml(BUILTIN_RULES)
    }

    /// Parse a `[[rules]]` table and validate it.
    pub fn from_toml(src: &str) -> Result<Self, ConformError> {
        let table: RuleTable =
            toml::from_str(src).map_err(|e| ConformError::Registry(e.to_string()))?;
        Self::from_rules(table.rules)
    }

    /// Validate and register `rules` in the given order.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, ConformError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(ConformError::Registry(format!(
                    "duplicate rule id '{}'",
                    rule.id
                )));
            }
            validate(rule)?;
        }
        Ok(Self { rules })
    }

    /// Append project rules after the existing ones.
    pub fn with_extra(self, extra: Vec<Rule>) -> Result<Self, ConformError> {
        let mut rules = self.rules;
        rules.extend(extra);
        Self::from_rules(rules)
    }

    /// Drop disabled rules and re-grade severities. Unknown ids are logged and ignored.
    pub fn apply_overrides(self, overrides: &BTreeMap<String, RuleOverride>) -> Self {
        for id in overrides.keys() {
            if !self.rules.iter().any(|r| &r.id == id) {
                log::warn!("override for unknown rule '{}' ignored", id);
            }
        }
        let rules = self
            .rules
            .into_iter()
            .filter_map(|mut rule| match overrides.get(&rule.id) {
                Some(ov) if ov.enabled == Some(false) => {
                    log::debug!("rule '{}' disabled by config", rule.id);
                    None
                }
                Some(ov) => {
                    if let Some(sev) = ov.severity {
                        rule.severity = sev;
                    }
                    Some(rule)
                }
                None => Some(rule),
            })
            .collect();
        Self { rules }
    }

    /// Rules in registration order.
    pub fn list_rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate(rule: &Rule) -> Result<(), ConformError> {
    if rule.id.trim().is_empty() {
        return Err(ConformError::Registry("rule with empty id".into()));
    }
    if rule.roles.is_empty() {
        return Err(ConformError::Registry(format!(
            "rule '{}' targets no roles",
            rule.id
        )));
    }
    for p in &rule.paths {
        Pattern::new(p).map_err(|e| {
            ConformError::Registry(format!("rule '{}': bad path glob '{}': {}", rule.id, p, e))
        })?;
    }
    for re in rule.check.regexes() {
        Regex::new(re).map_err(|e| {
            ConformError::Registry(format!("rule '{}': bad regex '{}': {}", rule.id, re, e))
        })?;
    }
    Ok(())
}
