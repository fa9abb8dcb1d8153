//! Data model shared by the evaluator, the fixed-point loop and the loaders.
//!
//! Wire names are PascalCase (`Key`, `Value`, `Operator`, `Criteria`,
//! `Actions`). Rules and their parts are immutable once loaded; only [`State`]
//! changes during a run.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Comparison applied by a single [`Criteria`].
///
/// Resolved from its wire symbol when the rules file is loaded, so an unknown
/// symbol never reaches the evaluation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = UnsupportedOperator;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "=" => Ok(Operator::Equals),
            "!=" => Ok(Operator::NotEquals),
            other => Err(UnsupportedOperator {
                symbol: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = UnsupportedOperator;

    fn try_from(symbol: String) -> Result<Self, Self::Error> {
        symbol.parse()
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.symbol().to_string()
    }
}

/// A criteria operator outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedOperator {
    pub symbol: String,
}

impl fmt::Display for UnsupportedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The operator {} is not supported. Please verify the rules file content.",
            self.symbol
        )
    }
}

impl std::error::Error for UnsupportedOperator {}

/// One condition a rule requires of the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Criteria {
    pub key: String,
    pub operator: Operator,
    pub value: String,
}

/// One assignment applied to the state when its rule fires.
///
/// The same `{Key, Value}` record shape is used for initial state entries and
/// for the rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Action {
    pub key: String,
    pub value: String,
}

/// A condition set paired with an effect set.
///
/// An empty `criteria` list always fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    /// Free-form label, only used in diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub criteria: Vec<Criteria>,
    pub actions: Vec<Action>,
}

impl Rule {
    /// Label for log lines: the rule name when present, else its position.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => format!("#{index} ({name})"),
            None => format!("#{index}"),
        }
    }
}

/// The record being transformed: key to string value, in insertion order.
///
/// Keys keep the position of their first insertion; overwriting a value does
/// not move it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    entries: IndexMap<String, String>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Write `value` under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Snapshot the state as `{Key, Value}` records in state order.
    pub fn to_entries(&self) -> Vec<Action> {
        self.iter()
            .map(|(key, value)| Action {
                key: key.to_string(),
                value: value.to_string(),
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        for (key, value) in iter {
            state.insert(key, value);
        }
        state
    }
}
