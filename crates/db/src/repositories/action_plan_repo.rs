//! Repository for the `action_plans` table.

use leanline_core::action_plan::ActionStatus;
use leanline_core::types::DbId;
use sqlx::PgPool;

use crate::models::action_plan::{ActionPlan, ActionPlanFilter, CreateActionPlan};

/// Column list for action_plans queries.
const COLUMNS: &str = "id, org_id, line_id, shift_id, action, root_cause, owner, due_date, \
    status, ai_confidence, ai_expected_impact, evidence_event_ids, created_at, closed_at";

/// Provides CRUD operations for action plans.
pub struct ActionPlanRepo;

impl ActionPlanRepo {
    /// Create an action plan, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateActionPlan,
    ) -> Result<ActionPlan, sqlx::Error> {
        let status = input.status();
        let query = format!(
            "INSERT INTO action_plans
                (org_id, line_id, shift_id, action, root_cause, owner, due_date, status,
                 ai_confidence, ai_expected_impact, evidence_event_ids, closed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                     CASE WHEN $12 THEN now() ELSE NULL END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionPlan>(&query)
            .bind(input.org_id)
            .bind(input.line_id)
            .bind(input.shift_id)
            .bind(input.action.trim())
            .bind(input.root_cause.trim())
            .bind(input.owner.trim())
            .bind(input.due_date)
            .bind(status.as_str())
            .bind(input.ai_confidence())
            .bind(input.ai_expected_impact())
            .bind(input.evidence_event_ids())
            .bind(status.is_closed())
            .fetch_one(pool)
            .await
    }

    /// List action plans matching the filter, soonest due first.
    pub async fn list(
        pool: &PgPool,
        filter: &ActionPlanFilter,
    ) -> Result<Vec<ActionPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_plans
             WHERE ($1::BIGINT IS NULL OR org_id = $1)
               AND ($2::BIGINT IS NULL OR line_id = $2)
               AND status = ANY($3)
             ORDER BY due_date, id"
        );
        sqlx::query_as::<_, ActionPlan>(&query)
            .bind(filter.org_id)
            .bind(filter.line_id)
            .bind(filter.status_names())
            .fetch_all(pool)
            .await
    }

    /// Set the status of an action plan. Returns `None` if it does not exist.
    ///
    /// `closed_at` is stamped when moving to closed and cleared otherwise.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ActionStatus,
    ) -> Result<Option<ActionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE action_plans
             SET status = $2,
                 closed_at = CASE WHEN $3 THEN COALESCE(closed_at, now()) ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionPlan>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(status.is_closed())
            .fetch_optional(pool)
            .await
    }
}
