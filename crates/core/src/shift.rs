//! Shift header inputs and their validation.

use serde::{Deserialize, Serialize};

/// Default shift name when the form leaves it blank.
pub const DEFAULT_SHIFT_NAME: &str = "A";

/// Targets and actuals for one production shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftInputs {
    /// Scheduled production time in minutes.
    pub planned_time_min: i32,
    /// Ideal time to produce one unit, in seconds.
    pub ideal_cycle_sec: f64,
    /// Units produced, good and bad.
    pub output_units: i32,
    /// Units scrapped.
    pub scrap_units: i32,
}

/// Validate shift inputs before they are persisted.
pub fn validate_shift_inputs(inputs: &ShiftInputs) -> Result<(), String> {
    if inputs.planned_time_min <= 0 {
        return Err("planned_time_min must be > 0".to_string());
    }
    if !inputs.ideal_cycle_sec.is_finite() || inputs.ideal_cycle_sec <= 0.0 {
        return Err("ideal_cycle_sec must be > 0".to_string());
    }
    if inputs.output_units < 0 {
        return Err("output_units must be >= 0".to_string());
    }
    if inputs.scrap_units < 0 {
        return Err("scrap_units must be >= 0".to_string());
    }
    Ok(())
}

/// Normalise an optional shift name, falling back to [`DEFAULT_SHIFT_NAME`].
pub fn normalize_shift_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => DEFAULT_SHIFT_NAME.to_string(),
    }
}
