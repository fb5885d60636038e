//! Action plan status lifecycle and draft validation.
//!
//! Status changes are always user-driven; nothing transitions automatically.

use serde::{Deserialize, Serialize};

use crate::ai::Confidence;
use crate::types::DbId;

/// Maximum length of the action and root-cause texts.
pub const MAX_ACTION_TEXT_LENGTH: usize = 2_000;

/// Status names accepted on create, update and list filters.
pub const VALID_ACTION_STATUSES: &[&str] = &["open", "closed", "delayed", "canceled"];

/// Statuses listed when no filter is given: work that is still pending.
pub const DEFAULT_LIST_STATUSES: &[ActionStatus] = &[ActionStatus::Open, ActionStatus::Delayed];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[serde(alias = "Open")]
    Open,
    #[serde(alias = "Closed")]
    Closed,
    #[serde(alias = "Delayed")]
    Delayed,
    #[serde(alias = "Canceled")]
    Canceled,
}

impl ActionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::Open => "open",
            ActionStatus::Closed => "closed",
            ActionStatus::Delayed => "delayed",
            ActionStatus::Canceled => "canceled",
        }
    }

    pub fn parse(name: &str) -> Result<Self, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(ActionStatus::Open),
            "closed" => Ok(ActionStatus::Closed),
            "delayed" => Ok(ActionStatus::Delayed),
            "canceled" => Ok(ActionStatus::Canceled),
            _ => Err(format!(
                "Invalid status '{name}'. Must be one of: {}",
                VALID_ACTION_STATUSES.join(", ")
            )),
        }
    }

    /// Whether moving into this status stamps `closed_at`.
    pub fn is_closed(self) -> bool {
        self == ActionStatus::Closed
    }
}

/// Parse a comma-separated status filter, falling back to
/// [`DEFAULT_LIST_STATUSES`] when absent or blank.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Vec<ActionStatus>, String> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(DEFAULT_LIST_STATUSES.to_vec());
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ActionStatus::parse)
        .collect()
}

/// Provenance recorded when an action plan is promoted from an AI suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSource {
    pub confidence: Option<Confidence>,
    pub expected_impact: Option<String>,
    #[serde(default)]
    pub evidence_event_ids: Vec<DbId>,
}

/// Validate the required free-text fields of an action plan draft.
pub fn validate_action_fields(action: &str, root_cause: &str, owner: &str) -> Result<(), String> {
    for (name, value) in [("action", action), ("root_cause", root_cause), ("owner", owner)] {
        if value.trim().is_empty() {
            return Err(format!("{name} is required"));
        }
        if value.chars().count() > MAX_ACTION_TEXT_LENGTH {
            return Err(format!(
                "{name} exceeds maximum length of {MAX_ACTION_TEXT_LENGTH} characters"
            ));
        }
    }
    Ok(())
}
