//! Handlers for the AI endpoints.
//!
//! `analyze` is a plain prompt proxy. `recommendations` builds the
//! evidence-only prompt for a shift on the server, then parses and filters
//! the reply so every returned action cites a real event of that shift.

use axum::extract::State;
use axum::Json;
use leanline_core::ai::{
    build_analysis_prompt, parse_recommended_actions, retain_traceable, RecommendedAction,
    UNPARSEABLE_WARNING,
};
use leanline_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::shifts::load_shift_analysis;
use crate::middleware::auth::AuthSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub shift_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    /// Raw model output.
    pub text: String,
    /// Actions whose evidence survived the traceability check.
    pub actions: Vec<RecommendedAction>,
    /// Actions dropped for citing no known event.
    pub discarded: usize,
    /// Set when the output held no JSON array.
    pub warning: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/ai/analyze (also /ai/analyze)
///
/// Forward `{prompt}` to the completion service and return `{text}`.
/// The body is read as loose JSON so a missing or non-string prompt is a
/// 400 with a message rather than an extractor rejection.
pub async fn analyze(
    auth: AuthSession,
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<AnalyzeResponse>> {
    let prompt = body
        .get("prompt")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Prompt is required".into()))?;

    tracing::info!(email = %auth.email, prompt_len = prompt.len(), "Forwarding prompt");

    let text = state.ai.complete(prompt).await?;
    Ok(Json(AnalyzeResponse { text }))
}

/// POST /api/ai/recommendations
///
/// Ask for improvement actions grounded in one shift's events and findings.
pub async fn recommendations(
    auth: AuthSession,
    State(state): State<AppState>,
    AppJson(input): AppJson<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let analysis = load_shift_analysis(state.store.as_ref(), input.shift_id).await?;

    let prompt = build_analysis_prompt(
        &analysis.shift.inputs(),
        &analysis.metrics,
        &analysis.events,
        &analysis.findings,
    )
    .map_err(|e| AppError::InternalError(format!("Prompt serialization failed: {e}")))?;

    let text = state.ai.complete(&prompt).await?;

    let response = match parse_recommended_actions(&text) {
        Some(actions) => {
            let traced = retain_traceable(actions, &analysis.events);
            RecommendationResponse {
                text,
                actions: traced.actions,
                discarded: traced.discarded,
                warning: None,
            }
        }
        None => RecommendationResponse {
            text,
            actions: Vec::new(),
            discarded: 0,
            warning: Some(UNPARSEABLE_WARNING),
        },
    };

    tracing::info!(
        email = %auth.email,
        shift_id = input.shift_id,
        actions = response.actions.len(),
        discarded = response.discarded,
        parsed = response.warning.is_none(),
        "AI recommendations generated"
    );

    Ok(Json(response))
}
