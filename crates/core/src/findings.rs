//! Deterministic findings over a shift's events and metrics.
//!
//! Pure logic with no database access. Each rule is checked independently
//! against the full input and contributes at most one finding; output order
//! follows rule order.

use serde::Serialize;

use crate::event::{EventType, ProductionEvent};
use crate::metrics::DerivedMetrics;
use crate::types::DbId;

/// Machine downtime occurrences that count as a repeat.
pub const MACHINE_DOWNTIME_REPEAT_COUNT: usize = 2;

/// Category label marking a machine-caused downtime.
pub const MACHINE_CATEGORY: &str = "Machine";

/// Changeover minutes per shift at or above which setup time is flagged.
pub const CHANGEOVER_TARGET_MIN: f64 = 15.0;

/// OEE below this ratio is flagged.
pub const OEE_TARGET: f64 = 0.65;

pub const RULE_REPEATED_MACHINE_DOWNTIME: &str = "repeated_machine_downtime";
pub const RULE_EXCESS_CHANGEOVER: &str = "excess_changeover";
pub const RULE_LOW_OEE: &str = "low_oee";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A rule-derived observation, citing the events that support it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Code of the rule that produced this finding.
    pub id: &'static str,
    pub severity: Severity,
    pub description: String,
    /// Never empty.
    pub evidence_event_ids: Vec<DbId>,
}

/// Run every rule and collect the findings that fire.
pub fn run_findings(events: &[ProductionEvent], metrics: &DerivedMetrics) -> Vec<Finding> {
    [
        repeated_machine_downtime(events),
        excess_changeover(events),
        low_oee(events, metrics),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn repeated_machine_downtime(events: &[ProductionEvent]) -> Option<Finding> {
    let ids: Vec<DbId> = events
        .iter()
        .filter(|e| e.kind.event_type() == EventType::Downtime && e.category == MACHINE_CATEGORY)
        .map(|e| e.id)
        .collect();

    (ids.len() >= MACHINE_DOWNTIME_REPEAT_COUNT).then(|| Finding {
        id: RULE_REPEATED_MACHINE_DOWNTIME,
        severity: Severity::High,
        description: "Repeated machine downtime detected (likely common cause).".to_string(),
        evidence_event_ids: ids,
    })
}

fn excess_changeover(events: &[ProductionEvent]) -> Option<Finding> {
    let changeovers: Vec<&ProductionEvent> = events
        .iter()
        .filter(|e| e.kind.event_type() == EventType::Changeover)
        .collect();
    let total: f64 = changeovers
        .iter()
        .filter_map(|e| e.kind.duration_min())
        .map(f64::from)
        .sum();

    if changeovers.is_empty() || total < CHANGEOVER_TARGET_MIN {
        return None;
    }
    Some(Finding {
        id: RULE_EXCESS_CHANGEOVER,
        severity: Severity::Medium,
        description: format!(
            "Changeover time ({total} min) appears above target \
             (method / setup standardization opportunity)."
        ),
        evidence_event_ids: changeovers.iter().map(|e| e.id).collect(),
    })
}

fn low_oee(events: &[ProductionEvent], metrics: &DerivedMetrics) -> Option<Finding> {
    let below_target = metrics.oee < OEE_TARGET;
    // Without events there is nothing to cite.
    if events.is_empty() || !below_target {
        return None;
    }
    Some(Finding {
        id: RULE_LOW_OEE,
        severity: Severity::High,
        description: format!(
            "OEE {:.1}% below {:.0}% threshold; prioritize top loss contributors \
             (downtime + changeover + quality losses).",
            metrics.oee * 100.0,
            OEE_TARGET * 100.0
        ),
        evidence_event_ids: events.iter().map(|e| e.id).collect(),
    })
}
