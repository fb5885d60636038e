//! Handlers for shift lookups and the per-shift analysis.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use leanline_core::error::CoreError;
use leanline_core::event::ProductionEvent;
use leanline_core::findings::{run_findings, Finding};
use leanline_core::metrics::{derive_metrics, DerivedMetrics};
use leanline_core::types::DbId;
use leanline_db::models::shift::Shift;
use leanline_db::Store;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery};
use crate::middleware::auth::AuthSession;
use crate::query::OrgParams;
use crate::state::AppState;

/// A shift with everything computed from its events.
pub struct ShiftAnalysis {
    pub shift: Shift,
    pub events: Vec<ProductionEvent>,
    pub metrics: DerivedMetrics,
    pub findings: Vec<Finding>,
}

/// Load a shift and its events, then derive metrics and findings.
///
/// Every event of the shift is read, oldest first.
pub async fn load_shift_analysis(store: &dyn Store, shift_id: DbId) -> AppResult<ShiftAnalysis> {
    let shift = store.find_shift(shift_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Shift",
            id: shift_id,
        })
    })?;

    let rows = store.events_for_shift(shift_id).await?;
    let events = rows
        .iter()
        .map(|row| row.to_domain())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Core(CoreError::Internal(e)))?;

    let metrics = derive_metrics(&events, &shift.inputs());
    let findings = run_findings(&events, &metrics);

    Ok(ShiftAnalysis {
        shift,
        events,
        metrics,
        findings,
    })
}

#[derive(Debug, Serialize)]
pub struct ShiftResponse {
    pub shift: Shift,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub shift: Shift,
    pub event_count: usize,
    pub metrics: DerivedMetrics,
    pub findings: Vec<Finding>,
}

/// GET /api/shifts/active?org_id=
///
/// The most recently started shift of an organization; 404 if it has none.
pub async fn active_shift(
    _auth: AuthSession,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<OrgParams>,
) -> AppResult<impl IntoResponse> {
    let org_id = params.require().map_err(AppError::BadRequest)?;

    let shift = state
        .store
        .latest_shift(org_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Active shift for organization",
                id: org_id,
            })
        })?;

    Ok(Json(ShiftResponse { shift }))
}

/// GET /api/shifts/{id}/analysis
///
/// Derived metrics and deterministic findings for one shift.
pub async fn shift_analysis(
    _auth: AuthSession,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let analysis = load_shift_analysis(state.store.as_ref(), id).await?;

    tracing::debug!(
        shift_id = id,
        events = analysis.events.len(),
        findings = analysis.findings.len(),
        oee = analysis.metrics.oee,
        "Shift analysed"
    );

    Ok(Json(AnalysisResponse {
        event_count: analysis.events.len(),
        shift: analysis.shift,
        metrics: analysis.metrics,
        findings: analysis.findings,
    }))
}
