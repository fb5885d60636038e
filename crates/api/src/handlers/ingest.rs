//! Handlers for the ingest form: production events and shift headers.
//!
//! Events are validated into a typed [`EventKind`] before anything is
//! written, so every stored row carries exactly the measurement its type
//! requires.
//!
//! [`EventKind`]: leanline_core::event::EventKind

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use leanline_core::error::CoreError;
use leanline_core::event::{validate_event, EventDraft, EventType, SUGGESTED_CATEGORIES};
use leanline_core::shift::validate_shift_inputs;
use leanline_core::types::DbId;
use leanline_db::models::event::{CreateProductionEvent, EventFilter, ProductionEventRow};
use leanline_db::models::shift::{CreateShift, Shift};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::handlers::shifts::ShiftResponse;
use crate::middleware::auth::AuthSession;
use crate::query::OrgParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/ingest/events`: the form draft plus the
/// shift it belongs to.
#[derive(Debug, Deserialize)]
pub struct IngestEventRequest {
    pub shift_id: DbId,
    #[serde(flatten)]
    pub draft: EventDraft,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event: ProductionEventRow,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<ProductionEventRow>,
}

/// Suggested category labels for one event type.
#[derive(Debug, Serialize)]
pub struct CategorySuggestions {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub categories: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub suggestions: Vec<CategorySuggestions>,
}

/// `GET /api/ingest/shift` answers `null` when the organization has no shift yet.
#[derive(Debug, Serialize)]
pub struct LatestShiftResponse {
    pub shift: Option<Shift>,
}

/// Trim an optional free-text field, dropping it when blank.
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Event handlers
// ---------------------------------------------------------------------------

/// POST /api/ingest/events
///
/// Validate and record one production event.
pub async fn create_event(
    auth: AuthSession,
    State(state): State<AppState>,
    AppJson(input): AppJson<IngestEventRequest>,
) -> AppResult<impl IntoResponse> {
    let draft = &input.draft;
    let kind = validate_event(draft).map_err(CoreError::Validation)?;

    // validate_event guarantees both are present.
    let (Some(line_id), Some(occurred_at)) = (draft.line_id, draft.timestamp) else {
        return Err(AppError::BadRequest("Line and timestamp are required.".into()));
    };

    let shift = state.store.find_shift(input.shift_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Shift",
            id: input.shift_id,
        })
    })?;
    let line = state.store.find_line(line_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "ProductionLine",
            id: line_id,
        })
    })?;
    if line.org_id != shift.org_id {
        return Err(AppError::BadRequest(
            "Line does not belong to the shift's organization.".into(),
        ));
    }

    let event = state
        .store
        .create_event(&CreateProductionEvent {
            shift_id: shift.id,
            line_id,
            kind,
            category: draft.category.as_deref().unwrap_or_default().trim().to_string(),
            occurred_at,
            comment: non_blank(&draft.comment),
            operator: non_blank(&draft.operator),
            station: non_blank(&draft.station),
        })
        .await?;

    tracing::info!(
        email = %auth.email,
        event_id = event.id,
        shift_id = event.shift_id,
        event_type = %event.event_type,
        "Production event recorded"
    );

    Ok((StatusCode::CREATED, Json(EventResponse { event })))
}

/// GET /api/ingest/events?shift_id=&line_id=&event_type=&from=&to=&limit=&offset=
///
/// List events oldest first.
pub async fn list_events(
    _auth: AuthSession,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<EventFilter>,
) -> AppResult<impl IntoResponse> {
    let events = state.store.list_events(&filter).await?;
    Ok(Json(EventListResponse { events }))
}

/// GET /api/ingest/categories
///
/// Suggested categories per event type, for the ingest form's picker.
/// Any non-blank category is still accepted on ingest.
pub async fn list_categories(_auth: AuthSession) -> Json<CategoryListResponse> {
    let suggestions = SUGGESTED_CATEGORIES
        .iter()
        .map(|&(event_type, categories)| CategorySuggestions {
            event_type,
            categories: categories.to_vec(),
        })
        .collect();
    Json(CategoryListResponse { suggestions })
}

// ---------------------------------------------------------------------------
// Shift handlers
// ---------------------------------------------------------------------------

/// POST /api/ingest/shift
///
/// Record a shift header. Shifts are immutable once saved.
pub async fn create_shift(
    auth: AuthSession,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateShift>,
) -> AppResult<impl IntoResponse> {
    validate_shift_inputs(&input.inputs).map_err(CoreError::Validation)?;

    if state.store.find_organization(input.org_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id: input.org_id,
        }));
    }
    if let Some(line_id) = input.line_id {
        let line = state.store.find_line(line_id).await?.ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ProductionLine",
                id: line_id,
            })
        })?;
        if line.org_id != input.org_id {
            return Err(AppError::BadRequest(
                "Line does not belong to the organization.".into(),
            ));
        }
    }

    let shift = state.store.create_shift(&input).await?;

    tracing::info!(
        email = %auth.email,
        shift_id = shift.id,
        org_id = shift.org_id,
        shift_name = %shift.shift_name,
        "Shift recorded"
    );

    Ok((StatusCode::CREATED, Json(ShiftResponse { shift })))
}

/// GET /api/ingest/shift?org_id=
///
/// The latest shift of an organization, or `null`.
pub async fn latest_shift(
    _auth: AuthSession,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<OrgParams>,
) -> AppResult<impl IntoResponse> {
    let org_id = params.require().map_err(AppError::BadRequest)?;
    let shift = state.store.latest_shift(org_id).await?;
    Ok(Json(LatestShiftResponse { shift }))
}
