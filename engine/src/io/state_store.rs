//! Initial state loading (source checks + schema + invariants).

use std::path::Path;

use anyhow::{Result, bail};
use tracing::debug;

use crate::core::invariants::state_from_entries;
use crate::core::types::{Action, State};
use crate::io::config::SourceConfig;
use crate::io::schema::{STATE_SCHEMA, deserialize_error, parse_and_validate};
use crate::io::source::read_source;

/// Load and validate the initial state file.
pub fn load_initial_state(path: &Path, source: &SourceConfig) -> Result<State> {
    let contents = read_source(path, source)?;
    let state = parse_initial_state(path, &contents)?;
    debug!(path = %path.display(), keys = state.len(), "initial state loaded");
    Ok(state)
}

/// Parse initial state contents; `path` is only used in error messages.
pub fn parse_initial_state(path: &Path, contents: &str) -> Result<State> {
    let value = parse_and_validate(path, contents, STATE_SCHEMA)?;
    let entries: Vec<Action> =
        serde_json::from_value(value).map_err(|err| deserialize_error(path, &[err.to_string()]))?;
    match state_from_entries(entries) {
        Ok(state) => Ok(state),
        Err(errors) => bail!(
            "invalid initial state in file: {}\n- {}",
            path.display(),
            errors.join("\n- ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn origin() -> &'static Path {
        Path::new("state.json")
    }

    #[test]
    fn empty_array_yields_empty_state() {
        let state = parse_initial_state(origin(), "[]").expect("parse");
        assert!(state.is_empty());
    }

    #[test]
    fn valid_entries_keep_values_and_order() {
        let raw = r#"[{ "Key": "field_923", "Value": "Hello there" },{ "Key": "field_5", "Value": "98;32" }]"#;
        let state = parse_initial_state(origin(), raw).expect("parse");
        assert_eq!(state.get("field_923"), Some("Hello there"));
        assert_eq!(state.get("field_5"), Some("98;32"));
        let keys: Vec<&str> = state.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["field_923", "field_5"]);
    }

    #[test]
    fn plain_text_is_rejected() {
        let err = parse_initial_state(origin(), "just some text").expect_err("expected error");
        assert!(err.to_string().contains("state.json"));
    }

    #[test]
    fn records_missing_fields_are_rejected() {
        let err = parse_initial_state(origin(), r#"[{"ping":"pong"},{"good":"morning"}]"#)
            .expect_err("expected error");
        let message = err.to_string();
        assert!(message.contains("Key"));
        assert!(message.lines().count() >= 3);
    }

    #[test]
    fn non_string_value_is_rejected() {
        let err = parse_initial_state(origin(), r#"[{"Key":"a","Value":1}]"#)
            .expect_err("expected error");
        assert!(err.to_string().starts_with("An error occurred"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let raw = r#"[{"Key":"a","Value":"1"},{"Key":"a","Value":"2"}]"#;
        let err = parse_initial_state(origin(), raw).expect_err("expected error");
        assert!(err.to_string().contains("duplicate key 'a'"));
    }

    #[test]
    fn load_checks_the_source_first() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        fs::write(&path, "").expect("write");
        let err = load_initial_state(&path, &SourceConfig::default()).expect_err("expected error");
        assert!(err.to_string().contains("is empty"));

        fs::write(&path, r#"[{"Key":"asleep","Value":"true"}]"#).expect("write");
        let state = load_initial_state(&path, &SourceConfig::default()).expect("load");
        assert_eq!(state.get("asleep"), Some("true"));
    }

    #[test]
    fn load_accepts_byte_order_mark() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        fs::write(&path, "\u{feff}[{\"Key\":\"a\",\"Value\":\"1\"}]").expect("write");
        let state = load_initial_state(&path, &SourceConfig::default()).expect("load");
        assert_eq!(state.get("a"), Some("1"));
    }
}
