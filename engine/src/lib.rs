//! Forward-chaining rule engine.
//!
//! Loads an initial key/value state and an ordered list of condition/action
//! rules, applies rules pass after pass until a pass changes nothing, and
//! renders the resulting state. The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (data model, criteria evaluation,
//!   the fixed-point loop). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting adapters (source checks, schema validation,
//!   loading, rendering, configuration).
//!
//! [`run`] wires the two together for the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
