//! Forward-chaining fixed-point loop.
//!
//! A pass walks every rule in list order, firing those whose criteria all hold
//! against the current state. Passes repeat until one produces no change. The
//! loop is iterative; pass count is unbounded unless a limit is configured.

use std::fmt;

use anyhow::Result;
use tracing::{debug, info, trace};

use crate::core::evaluator::{BasicCriteriaEvaluator, CriteriaEvaluator};
use crate::core::types::{Action, Criteria, Rule, State};

/// Outcome of a single pass over the rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// True if any applied action created a key or changed a value.
    pub changed: bool,
    /// Indices of rules that fired, in firing order.
    pub fired: Vec<usize>,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    /// Passes executed, including the final pass that changed nothing.
    pub passes: u64,
    /// Total rule firings across all passes.
    pub rules_fired: usize,
}

/// The run did not reach a fixed point within the configured number of passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassLimitExceeded {
    pub max_passes: u32,
}

impl fmt::Display for PassLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rules did not reach a fixed point within {} passes",
            self.max_passes
        )
    }
}

impl std::error::Error for PassLimitExceeded {}

/// True iff every criteria references a present key and is fulfilled.
///
/// A criteria on an absent key makes the rule not fire; it is not an error.
/// Evaluation stops at the first criteria that does not hold.
pub fn can_fire<E: CriteriaEvaluator>(
    criteria: &[Criteria],
    state: &State,
    evaluator: &E,
) -> Result<bool> {
    for check in criteria {
        let Some(current) = state.get(&check.key) else {
            return Ok(false);
        };
        if !evaluator.is_fulfilled(check, current)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Write every action into `state`, in order.
///
/// Returns true if at least one action added a key or replaced a different
/// value. Writing an equal value counts as no change.
pub fn apply_actions(actions: &[Action], state: &mut State) -> bool {
    let mut changed = false;
    for action in actions {
        let previous = state.insert(action.key.as_str(), action.value.as_str());
        if previous.as_deref() != Some(action.value.as_str()) {
            changed = true;
        }
    }
    changed
}

/// Run one full pass over `rules` in list order.
pub fn run_pass<E: CriteriaEvaluator>(
    rules: &[Rule],
    state: &mut State,
    evaluator: &E,
) -> Result<PassSummary> {
    let mut summary = PassSummary::default();
    for (index, rule) in rules.iter().enumerate() {
        if !can_fire(&rule.criteria, state, evaluator)? {
            continue;
        }
        let changed = apply_actions(&rule.actions, state);
        trace!(rule = %rule.label(index), changed, "rule fired");
        summary.fired.push(index);
        summary.changed |= changed;
    }
    Ok(summary)
}

/// Owns the state and rules for one evaluation.
#[derive(Debug, Clone)]
pub struct RuleEngine<E = BasicCriteriaEvaluator> {
    state: State,
    rules: Vec<Rule>,
    evaluator: E,
    max_passes: Option<u32>,
}

impl RuleEngine<BasicCriteriaEvaluator> {
    pub fn new(state: State, rules: Vec<Rule>) -> Self {
        Self::with_evaluator(state, rules, BasicCriteriaEvaluator)
    }
}

impl<E: CriteriaEvaluator> RuleEngine<E> {
    pub fn with_evaluator(state: State, rules: Vec<Rule>, evaluator: E) -> Self {
        Self {
            state,
            rules,
            evaluator,
            max_passes: None,
        }
    }

    /// Fail with [`PassLimitExceeded`] instead of running more than `max_passes`
    /// passes. `None` (the default) never gives up.
    pub fn with_max_passes(mut self, max_passes: Option<u32>) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Current state; final once [`RuleEngine::run`] has returned `Ok`.
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }

    /// Repeat passes until one changes nothing.
    ///
    /// Any evaluator error aborts the run; the state is then partially updated
    /// and must not be emitted.
    pub fn run(&mut self) -> Result<Convergence> {
        let mut passes: u64 = 0;
        let mut rules_fired: usize = 0;
        let mut changed = true;

        while changed {
            if let Some(max_passes) = self.max_passes {
                if passes >= u64::from(max_passes) {
                    return Err(PassLimitExceeded { max_passes }.into());
                }
            }
            passes += 1;
            let summary = run_pass(&self.rules, &mut self.state, &self.evaluator)?;
            rules_fired = rules_fired.saturating_add(summary.fired.len());
            debug!(
                pass = passes,
                fired = summary.fired.len(),
                changed = summary.changed,
                "pass complete"
            );
            changed = summary.changed;
        }

        info!(
            passes,
            rules_fired,
            keys = self.state.len(),
            "fixed point reached"
        );
        Ok(Convergence {
            passes,
            rules_fired,
        })
    }
}
