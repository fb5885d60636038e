//! Handlers for organizations and their production lines.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use leanline_core::error::CoreError;
use leanline_core::org::{validate_line_status, validate_name};
use leanline_core::types::DbId;
use leanline_db::models::organization::{CreateOrganization, Organization};
use leanline_db::models::production_line::{CreateProductionLine, ProductionLine};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub organization: Organization,
}

#[derive(Debug, Serialize)]
pub struct OrganizationListResponse {
    pub organizations: Vec<Organization>,
}

#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub line: ProductionLine,
}

#[derive(Debug, Serialize)]
pub struct LineListResponse {
    pub lines: Vec<ProductionLine>,
}

/// GET /api/orgs
pub async fn list_orgs(
    _auth: AuthSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let organizations = state.store.list_organizations().await?;
    Ok(Json(OrganizationListResponse { organizations }))
}

/// POST /api/orgs
pub async fn create_org(
    auth: AuthSession,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateOrganization>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name).map_err(CoreError::Validation)?;

    let organization = state.store.create_organization(&input).await?;
    tracing::info!(email = %auth.email, org_id = organization.id, "Organization created");

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse { organization }),
    ))
}

/// GET /api/orgs/{id}/lines
pub async fn list_lines(
    _auth: AuthSession,
    State(state): State<AppState>,
    AppPath(org_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_org_exists(&state, org_id).await?;
    let lines = state.store.list_lines(org_id).await?;
    Ok(Json(LineListResponse { lines }))
}

/// POST /api/orgs/{id}/lines
pub async fn create_line(
    auth: AuthSession,
    State(state): State<AppState>,
    AppPath(org_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateProductionLine>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name).map_err(CoreError::Validation)?;
    if let Some(status) = input.status.as_deref() {
        validate_line_status(status).map_err(CoreError::Validation)?;
    }
    if input.output_per_hour.is_some_and(|n| n < 0) {
        return Err(CoreError::Validation("output_per_hour must be >= 0".into()).into());
    }
    ensure_org_exists(&state, org_id).await?;

    let line = state.store.create_line(org_id, &input).await?;
    tracing::info!(email = %auth.email, org_id, line_id = line.id, "Production line created");

    Ok((StatusCode::CREATED, Json(LineResponse { line })))
}

async fn ensure_org_exists(state: &AppState, org_id: DbId) -> AppResult<()> {
    match state.store.find_organization(org_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id: org_id,
        })),
    }
}
