//! Process exit codes.

/// Every condition met (or fixed).
pub const OK: i32 = 0;
/// At least one condition unmet, or the run failed outright.
pub const INVALID: i32 = 1;
