//! Test-only builders for rules and state, and temp-dir input fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::types::{Action, Criteria, Operator, Rule, State};

/// Rules file for the wake-up scenario, in the on-disk format.
pub const CALIBRATION_RULES_JSON: &str = r#"[
  {
    "Criteria": [{ "Key": "get-ready", "Operator": "=", "Value": "true" }],
    "Actions": [{ "Key": "work", "Value": "true" }]
  },
  {
    "Criteria": [{ "Key": "asleep", "Operator": "=", "Value": "false" }],
    "Actions": [
      { "Key": "stretch", "Value": "true" },
      { "Key": "check-phone", "Value": "true" }
    ]
  },
  {
    "Criteria": [{ "Key": "asleep", "Operator": "=", "Value": "true" }],
    "Actions": [{ "Key": "asleep", "Value": "false" }]
  },
  {
    "Criteria": [
      { "Key": "asleep", "Operator": "=", "Value": "false" },
      { "Key": "check-phone", "Operator": "=", "Value": "true" }
    ],
    "Actions": [{ "Key": "get-ready", "Value": "true" }]
  }
]
"#;

pub fn criteria(key: &str, operator: Operator, value: &str) -> Criteria {
    Criteria {
        key: key.to_string(),
        operator,
        value: value.to_string(),
    }
}

pub fn action(key: &str, value: &str) -> Action {
    Action {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Create an unnamed rule.
pub fn rule(criteria: Vec<Criteria>, actions: Vec<Action>) -> Rule {
    Rule {
        name: None,
        criteria,
        actions,
    }
}

/// Create a state with entries in the given order.
pub fn state_of(entries: &[(&str, &str)]) -> State {
    entries.iter().copied().collect()
}

/// The wake-up scenario: starting from `asleep=true` it converges to
/// `asleep=false, stretch, check-phone, get-ready, work` all set.
pub fn calibration_rules() -> Vec<Rule> {
    vec![
        rule(
            vec![criteria("get-ready", Operator::Equals, "true")],
            vec![action("work", "true")],
        ),
        rule(
            vec![criteria("asleep", Operator::Equals, "false")],
            vec![action("stretch", "true"), action("check-phone", "true")],
        ),
        rule(
            vec![criteria("asleep", Operator::Equals, "true")],
            vec![action("asleep", "false")],
        ),
        rule(
            vec![
                criteria("asleep", Operator::Equals, "false"),
                criteria("check-phone", Operator::Equals, "true"),
            ],
            vec![action("get-ready", "true")],
        ),
    ]
}

/// Temporary directory holding input files for a run.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the fixture and return its path.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn write_calibration_rules(&self) -> Result<PathBuf> {
        self.write("rules.json", CALIBRATION_RULES_JSON)
    }
}
