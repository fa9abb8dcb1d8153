//! Embedded JSON Schemas for input files and aggregate error reporting.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::Draft;
use serde_json::Value;

pub const STATE_SCHEMA: &str = include_str!("../../schemas/state.schema.json");
pub const RULES_SCHEMA: &str = include_str!("../../schemas/rules.schema.json");

/// Validate `instance` against `schema_raw` (Draft 2020-12).
///
/// Returns every violation message; an empty list means the instance conforms.
pub fn schema_violations(schema_raw: &str, instance: &Value) -> Result<Vec<String>> {
    let schema: Value = serde_json::from_str(schema_raw).context("parse json schema")?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| anyhow!("invalid schema: {}", err))?;
    Ok(compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect())
}

/// Message listing every problem found while reading the records in `path`.
pub fn deserialize_message(path: &Path, issues: &[String]) -> String {
    format!(
        "An error occurred while deserializing the objects in file: {}\n- {}",
        path.display(),
        issues.join("\n- ")
    )
}

/// Error form of [`deserialize_message`].
pub fn deserialize_error(path: &Path, issues: &[String]) -> anyhow::Error {
    anyhow!(deserialize_message(path, issues))
}

/// Parse `raw` as JSON and check it against `schema_raw`, failing with an
/// aggregate error naming `path`.
pub fn parse_and_validate(path: &Path, raw: &str, schema_raw: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| deserialize_error(path, &[err.to_string()]))?;
    let violations = schema_violations(schema_raw, &value)?;
    if !violations.is_empty() {
        return Err(deserialize_error(path, &violations));
    }
    Ok(value)
}
