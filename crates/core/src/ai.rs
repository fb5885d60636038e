//! Prompt construction and response handling for AI-suggested actions.
//!
//! The completion service is asked, through the prompt only, to answer with
//! a JSON array of actions. Nothing guarantees it does, so extraction here is
//! a best-effort scrape: strip code fences, try the whole text, then try the
//! span between the first `[` and the last `]`.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::event::ProductionEvent;
use crate::findings::Finding;
use crate::metrics::DerivedMetrics;
use crate::shift::ShiftInputs;
use crate::types::DbId;

/// System instruction sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "You are a senior manufacturing engineer and Lean \
Manufacturing expert. Be assertive but justified. Never invent data. Output must follow \
the user instruction strictly.";

/// Sampling temperature for completion requests.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Warning returned alongside raw text when no action array could be parsed.
pub const UNPARSEABLE_WARNING: &str =
    "AI returned output that could not be parsed as a JSON array. Showing raw output instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

/// One improvement action suggested by the completion service.
///
/// Deserialization accepts the camelCase keys the prompt asks for as well as
/// snake_case, and tolerates missing optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub action: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "expectedImpact")]
    pub expected_impact: String,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(
        default,
        alias = "evidenceEventIds",
        deserialize_with = "deserialize_event_ids"
    )]
    pub evidence_event_ids: Vec<DbId>,
}

/// Actions that survived the traceability check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceableActions {
    pub actions: Vec<RecommendedAction>,
    /// Actions dropped because none of their evidence ids exist.
    pub discarded: usize,
}

/// Build the evidence-only analysis prompt for a shift.
pub fn build_analysis_prompt(
    shift: &ShiftInputs,
    metrics: &DerivedMetrics,
    events: &[ProductionEvent],
    findings: &[Finding],
) -> Result<String, serde_json::Error> {
    Ok(format!(
        r#"Rules:
- Only use provided data (no invented events/metrics).
- Output JSON array only (no markdown).
- 3 to 6 actions, ranked most important first.
- "expectedImpact" must be measurable (e.g. "+3-5% OEE", "-10 min/shift downtime").
- Tie each action to evidenceEventIds taken from the "id" fields of the provided events.

DATA:
Shift Inputs: {shift}
Derived Metrics: {metrics}
Events: {events}
Deterministic Findings: {findings}

Output JSON schema:
[
  {{
    "action": "string",
    "category": "Machine|Method|Material|Man|Other",
    "expectedImpact": "string",
    "confidence": "Low|Medium|High",
    "evidenceEventIds": [123, 456]
  }}
]"#,
        shift = serde_json::to_string(shift)?,
        metrics = serde_json::to_string(metrics)?,
        events = serde_json::to_string(events)?,
        findings = serde_json::to_string(findings)?,
    ))
}

/// Remove Markdown code-fence markers (and a `json` language tag directly
/// after a fence), then trim.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, part) in text.split("```").enumerate() {
        let part = match part.get(..4) {
            Some(tag) if i > 0 && tag.eq_ignore_ascii_case("json") => &part[4..],
            _ => part,
        };
        out.push_str(part);
    }
    out.trim().to_string()
}

/// Extract a JSON array from free-form model output.
///
/// Returns `None` when neither the whole (fence-stripped) text nor the span
/// from the first `[` to the last `]` parses as an array.
pub fn extract_action_array(text: &str) -> Option<Vec<Value>> {
    let cleaned = strip_code_fences(text);

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&cleaned) {
        return Some(items);
    }

    let start = cleaned.find('[')?;
    let end = cleaned.rfind(']')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&cleaned[start..=end]) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Extract and type the actions in model output.
///
/// Array elements that are not action objects are skipped; `None` means no
/// array was found at all.
pub fn parse_recommended_actions(text: &str) -> Option<Vec<RecommendedAction>> {
    let items = extract_action_array(text)?;
    Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    )
}

/// Keep only evidence ids that exist in `events`, discarding actions left
/// with none.
pub fn retain_traceable(
    actions: Vec<RecommendedAction>,
    events: &[ProductionEvent],
) -> TraceableActions {
    let known: HashSet<DbId> = events.iter().map(|e| e.id).collect();
    let total = actions.len();

    let actions: Vec<RecommendedAction> = actions
        .into_iter()
        .filter_map(|mut a| {
            a.evidence_event_ids.retain(|id| known.contains(id));
            (!a.evidence_event_ids.is_empty()).then_some(a)
        })
        .collect();

    TraceableActions {
        discarded: total - actions.len(),
        actions,
    }
}

/// Accept ids as numbers or numeric strings; anything else is ignored.
fn deserialize_event_ids<'de, D>(deserializer: D) -> Result<Vec<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect())
}
