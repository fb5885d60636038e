//! Limit/offset clamping shared by list endpoints.

/// Rows returned when the caller gives no limit.
pub const DEFAULT_LIST_LIMIT: i64 = 200;

/// Upper bound on any requested limit.
pub const MAX_LIST_LIMIT: i64 = 1_000;

/// Clamp a user-provided limit to `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
