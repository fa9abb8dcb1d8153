//! Stable exit codes for the engine CLI.

/// The rules reached a fixed point and the final state was printed.
pub const OK: i32 = 0;
/// Bad arguments, unreadable or malformed input, or an evaluation failure.
pub const INVALID: i32 = 1;
/// The configured pass limit was reached before a fixed point.
pub const NOT_CONVERGED: i32 = 2;
