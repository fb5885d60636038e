//! OEE derivation for a single shift.
//!
//! Pure logic: the caller loads the shift header and its events and passes
//! them in.

use serde::Serialize;

use crate::event::ProductionEvent;
use crate::shift::ShiftInputs;

/// Availability, performance, quality and their product for one shift.
///
/// Ratios are nominally in `[0, 1]` but are not clamped: performance exceeds
/// 1 when output beats the ideal cycle, and availability bottoms out at
/// `1 / planned_time_min` once downtime covers the whole shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub downtime_min: f64,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

/// Total minutes lost to downtime and changeover events.
pub fn downtime_minutes(events: &[ProductionEvent]) -> f64 {
    events
        .iter()
        .filter_map(|e| e.kind.duration_min())
        // fold from +0.0; an empty f64 sum is -0.0
        .fold(0.0, |total, d| total + f64::from(d))
}

/// Derive OEE metrics from a shift's inputs and its events.
pub fn derive_metrics(events: &[ProductionEvent], shift: &ShiftInputs) -> DerivedMetrics {
    let planned = f64::from(shift.planned_time_min);
    let output = f64::from(shift.output_units);
    let scrap = f64::from(shift.scrap_units);

    let downtime_min = downtime_minutes(events);
    // Floor of one minute keeps the divisions below finite.
    let runtime_min = (planned - downtime_min).max(1.0);

    let availability = runtime_min / planned;
    let performance = (output * shift.ideal_cycle_sec) / (runtime_min * 60.0);
    let quality = (output - scrap) / output.max(1.0);

    DerivedMetrics {
        downtime_min,
        availability,
        performance,
        quality,
        oee: availability * performance * quality,
    }
}
