//! I/O adapters around the rule engine core.

pub mod config;
pub mod output;
pub mod rules_store;
pub mod schema;
pub mod source;
pub mod state_store;
