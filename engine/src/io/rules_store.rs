//! Rules loading (source checks + schema + operator resolution).

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::core::types::{Operator, Rule, UnsupportedOperator};
use crate::io::config::SourceConfig;
use crate::io::schema::{RULES_SCHEMA, deserialize_error, deserialize_message, parse_and_validate};
use crate::io::source::read_source;

/// A criteria operator that failed to resolve, with its position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorLocation {
    pub rule: usize,
    pub criteria: usize,
    pub error: UnsupportedOperator,
}

/// Every unsupported operator found in a rules file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedOperators {
    pub path: PathBuf,
    pub found: Vec<OperatorLocation>,
}

impl fmt::Display for UnsupportedOperators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issues: Vec<String> = self
            .found
            .iter()
            .map(|at| format!("rule {}, criteria {}: {}", at.rule, at.criteria, at.error))
            .collect();
        f.write_str(&deserialize_message(&self.path, &issues))
    }
}

impl std::error::Error for UnsupportedOperators {}

/// Load and validate the rules file.
pub fn load_rules(path: &Path, source: &SourceConfig) -> Result<Vec<Rule>> {
    let contents = read_source(path, source)?;
    let rules = parse_rules(path, &contents)?;
    debug!(path = %path.display(), rules = rules.len(), "rules loaded");
    Ok(rules)
}

/// Parse rules contents; `path` is only used in error messages.
///
/// Every criteria operator is resolved here, so an unsupported symbol fails
/// the load with [`UnsupportedOperators`] rather than the evaluation.
pub fn parse_rules(path: &Path, contents: &str) -> Result<Vec<Rule>> {
    let value = parse_and_validate(path, contents, RULES_SCHEMA)?;
    let found = unsupported_operators(&value);
    if !found.is_empty() {
        return Err(UnsupportedOperators {
            path: path.to_path_buf(),
            found,
        }
        .into());
    }
    serde_json::from_value(value).map_err(|err| deserialize_error(path, &[err.to_string()]))
}

/// Locate every criteria whose operator does not resolve.
///
/// Expects a schema-conforming rules document.
fn unsupported_operators(rules: &Value) -> Vec<OperatorLocation> {
    let mut found = Vec::new();
    let Some(rules) = rules.as_array() else {
        return found;
    };
    for (rule_index, rule) in rules.iter().enumerate() {
        let Some(criteria) = rule.get("Criteria").and_then(Value::as_array) else {
            continue;
        };
        for (criteria_index, check) in criteria.iter().enumerate() {
            let Some(symbol) = check.get("Operator").and_then(Value::as_str) else {
                continue;
            };
            if let Err(error) = symbol.parse::<Operator>() {
                found.push(OperatorLocation {
                    rule: rule_index,
                    criteria: criteria_index,
                    error,
                });
            }
        }
    }
    found
}
