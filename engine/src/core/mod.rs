//! Deterministic, pure logic for rule evaluation.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod evaluator;
pub mod fixpoint;
pub mod invariants;
pub mod types;
