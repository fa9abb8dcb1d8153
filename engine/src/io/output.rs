//! Rendering of the final state.

use anyhow::{Context, Result};

use crate::core::types::State;

/// Render `state` as a pretty-printed array of `{Key, Value}` records, in
/// state order.
pub fn render_state(state: &State) -> Result<String> {
    serde_json::to_string_pretty(&state.to_entries()).context("serialize final state")
}
