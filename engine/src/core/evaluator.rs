//! Criteria evaluation against a single state value.

use anyhow::Result;

use crate::core::types::{Criteria, Operator};

/// Decides whether one criteria holds.
///
/// The caller resolves the state value for `criteria.key` first; a missing key
/// never reaches the evaluator. An `Err` aborts the whole engine run.
pub trait CriteriaEvaluator {
    fn is_fulfilled(&self, criteria: &Criteria, current: &str) -> Result<bool>;
}

/// Exact string comparison for `=` and `!=`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCriteriaEvaluator;

impl CriteriaEvaluator for BasicCriteriaEvaluator {
    fn is_fulfilled(&self, criteria: &Criteria, current: &str) -> Result<bool> {
        Ok(match criteria.operator {
            Operator::Equals => current == criteria.value,
            Operator::NotEquals => current != criteria.value,
        })
    }
}
