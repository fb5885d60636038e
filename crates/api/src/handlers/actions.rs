//! Handlers for action plans.
//!
//! Plans are created by hand or promoted from an AI suggestion (with its
//! provenance in `ai_source`). Status changes are always user-driven.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use leanline_core::action_plan::{parse_status_filter, validate_action_fields, ActionStatus};
use leanline_core::error::CoreError;
use leanline_core::types::DbId;
use leanline_db::models::action_plan::{ActionPlan, ActionPlanFilter, CreateActionPlan};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthSession;
use crate::query::ActionListParams;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub action: ActionPlan,
}

#[derive(Debug, Serialize)]
pub struct ActionListResponse {
    pub actions: Vec<ActionPlan>,
}

/// Request body for `PATCH /api/actions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// POST /api/actions
///
/// Create an action plan against an existing organization and line.
pub async fn create_action(
    auth: AuthSession,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateActionPlan>,
) -> AppResult<impl IntoResponse> {
    validate_action_fields(&input.action, &input.root_cause, &input.owner)
        .map_err(CoreError::Validation)?;

    if state.store.find_organization(input.org_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id: input.org_id,
        }));
    }
    let line = state.store.find_line(input.line_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "ProductionLine",
            id: input.line_id,
        })
    })?;
    if line.org_id != input.org_id {
        return Err(AppError::BadRequest(
            "Line does not belong to the organization.".into(),
        ));
    }
    if let Some(shift_id) = input.shift_id {
        if state.store.find_shift(shift_id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Shift",
                id: shift_id,
            }));
        }
    }

    let action = state.store.create_action_plan(&input).await?;

    tracing::info!(
        email = %auth.email,
        action_id = action.id,
        line_id = action.line_id,
        from_ai = input.ai_source.is_some(),
        "Action plan created"
    );

    Ok((StatusCode::CREATED, Json(ActionResponse { action })))
}

/// GET /api/actions?org_id=&line_id=&status=
///
/// List action plans, soonest due first. Without `status`, only open and
/// delayed plans are returned.
pub async fn list_actions(
    _auth: AuthSession,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ActionListParams>,
) -> AppResult<impl IntoResponse> {
    let statuses =
        parse_status_filter(params.status.as_deref()).map_err(CoreError::Validation)?;

    let actions = state
        .store
        .list_action_plans(&ActionPlanFilter {
            org_id: params.org_id,
            line_id: params.line_id,
            statuses,
        })
        .await?;

    Ok(Json(ActionListResponse { actions }))
}

/// PATCH /api/actions/{id}/status
///
/// Move a plan to a new status. `closed_at` is stamped on close and cleared
/// on any other status.
pub async fn update_status(
    auth: AuthSession,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = ActionStatus::parse(&input.status).map_err(CoreError::Validation)?;

    let action = state
        .store
        .update_action_status(id, status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ActionPlan",
                id,
            })
        })?;

    tracing::info!(
        email = %auth.email,
        action_id = id,
        status = status.as_str(),
        "Action plan status changed"
    );

    Ok(Json(ActionResponse { action }))
}
