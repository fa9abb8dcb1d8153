//! Orchestration for a single engine run: load, evaluate, render.

use std::path::Path;

use anyhow::Result;
use tracing::{info, instrument};

use crate::core::fixpoint::{Convergence, RuleEngine};
use crate::core::types::State;
use crate::io::config::EngineConfig;
use crate::io::output::render_state;
use crate::io::rules_store::load_rules;
use crate::io::state_store::load_initial_state;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Final state at the fixed point.
    pub state: State,
    pub convergence: Convergence,
    /// `state` rendered for output.
    pub output: String,
}

/// Load both input files, run the engine to a fixed point and render the result.
///
/// All-or-nothing: any load, evaluation or pass-limit failure returns `Err`
/// and nothing is rendered.
#[instrument(skip_all, fields(state = %state_path.display(), rules = %rules_path.display()))]
pub fn run_files(state_path: &Path, rules_path: &Path, config: &EngineConfig) -> Result<RunOutcome> {
    config.validate()?;
    let initial = load_initial_state(state_path, &config.source)?;
    let rules = load_rules(rules_path, &config.source)?;
    info!(keys = initial.len(), rules = rules.len(), "starting rule engine");

    let mut engine = RuleEngine::new(initial, rules).with_max_passes(config.max_passes);
    let convergence = engine.run()?;
    let state = engine.into_state();
    let output = render_state(&state)?;
    Ok(RunOutcome {
        state,
        convergence,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixpoint::PassLimitExceeded;
    use crate::test_support::Fixture;

    #[test]
    fn runs_calibration_files() {
        let fixture = Fixture::new().expect("fixture");
        let state = fixture
            .write("state.json", r#"[{"Key":"asleep","Value":"true"}]"#)
            .expect("state");
        let rules = fixture.write_calibration_rules().expect("rules");

        let outcome = run_files(&state, &rules, &EngineConfig::default()).expect("run");
        assert_eq!(outcome.state.get("work"), Some("true"));
        assert_eq!(outcome.convergence.passes, 4);
        assert!(outcome.output.starts_with("[\n  {\n    \"Key\": \"asleep\""));
    }

    #[test]
    fn bad_rules_fail_before_evaluation() {
        let fixture = Fixture::new().expect("fixture");
        let state = fixture.write("state.json", "[]").expect("state");
        let rules = fixture.write("rules.txt", "[]").expect("rules");
        let err = run_files(&state, &rules, &EngineConfig::default()).expect_err("expected error");
        assert!(err.to_string().contains("is not a .json file"));
    }

    #[test]
    fn pass_limit_from_config_is_enforced() {
        let fixture = Fixture::new().expect("fixture");
        let state = fixture
            .write("state.json", r#"[{"Key":"flag","Value":"on"}]"#)
            .expect("state");
        let rules = fixture
            .write(
                "rules.json",
                r#"[
                  {"Criteria":[{"Key":"flag","Operator":"=","Value":"on"}],"Actions":[{"Key":"flag","Value":"off"}]},
                  {"Criteria":[{"Key":"flag","Operator":"=","Value":"off"}],"Actions":[{"Key":"flag","Value":"on"}]}
                ]"#,
            )
            .expect("rules");
        let config = EngineConfig {
            max_passes: Some(3),
            ..EngineConfig::default()
        };
        let err = run_files(&state, &rules, &config).expect_err("expected limit");
        assert!(err.downcast_ref::<PassLimitExceeded>().is_some());
    }
}
