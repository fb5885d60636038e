//! Action plan model.

use chrono::NaiveDate;
use leanline_core::action_plan::{ActionStatus, AiSource};
use leanline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `action_plans` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActionPlan {
    pub id: DbId,
    pub org_id: DbId,
    pub line_id: DbId,
    pub shift_id: Option<DbId>,
    pub action: String,
    pub root_cause: String,
    pub owner: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub ai_confidence: Option<String>,
    pub ai_expected_impact: Option<String>,
    pub evidence_event_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

/// DTO for creating an action plan, optionally promoted from an AI suggestion.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActionPlan {
    pub org_id: DbId,
    pub line_id: DbId,
    pub shift_id: Option<DbId>,
    pub action: String,
    pub root_cause: String,
    pub owner: String,
    pub due_date: NaiveDate,
    pub status: Option<ActionStatus>,
    pub ai_source: Option<AiSource>,
}

impl CreateActionPlan {
    pub fn status(&self) -> ActionStatus {
        self.status.unwrap_or(ActionStatus::Open)
    }

    /// Confidence label as stored in `ai_confidence`.
    pub fn ai_confidence(&self) -> Option<String> {
        let confidence = self.ai_source.as_ref()?.confidence?;
        serde_json::to_value(confidence)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn ai_expected_impact(&self) -> Option<String> {
        self.ai_source.as_ref()?.expected_impact.clone()
    }

    pub fn evidence_event_ids(&self) -> Vec<DbId> {
        self.ai_source
            .as_ref()
            .map(|s| s.evidence_event_ids.clone())
            .unwrap_or_default()
    }
}

/// Filters for listing action plans.
#[derive(Debug, Clone)]
pub struct ActionPlanFilter {
    pub org_id: Option<DbId>,
    pub line_id: Option<DbId>,
    /// Never empty; callers default it to open + delayed.
    pub statuses: Vec<ActionStatus>,
}

impl ActionPlanFilter {
    pub fn matches(&self, plan: &ActionPlan) -> bool {
        self.org_id.map_or(true, |id| plan.org_id == id)
            && self.line_id.map_or(true, |id| plan.line_id == id)
            && self.statuses.iter().any(|s| plan.status == s.as_str())
    }

    pub fn status_names(&self) -> Vec<String> {
        self.statuses.iter().map(|s| s.as_str().to_string()).collect()
    }
}
