//! Production event model.

use leanline_core::event::{EventKind, EventType, ProductionEvent};
use leanline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `production_events` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductionEventRow {
    pub id: DbId,
    pub shift_id: DbId,
    pub line_id: DbId,
    #[serde(rename = "type")]
    pub event_type: String,
    pub duration_min: Option<i32>,
    pub qty: Option<i32>,
    pub category: String,
    #[serde(rename = "timestamp")]
    pub occurred_at: Timestamp,
    pub comment: Option<String>,
    pub operator: Option<String>,
    pub station: Option<String>,
    pub created_at: Timestamp,
}

impl ProductionEventRow {
    /// Convert to the domain event consumed by the metrics and findings engines.
    pub fn to_domain(&self) -> Result<ProductionEvent, String> {
        Ok(ProductionEvent {
            id: self.id,
            timestamp: self.occurred_at,
            kind: EventKind::from_parts(&self.event_type, self.duration_min, self.qty)?,
            category: self.category.clone(),
            comment: self.comment.clone(),
            operator: self.operator.clone(),
            station: self.station.clone(),
        })
    }
}

/// A validated event ready to be inserted.
///
/// Built by the ingest handler from an `EventDraft` once it has passed
/// validation, so the measurement columns are always consistent.
#[derive(Debug, Clone)]
pub struct CreateProductionEvent {
    pub shift_id: DbId,
    pub line_id: DbId,
    pub kind: EventKind,
    pub category: String,
    pub occurred_at: Timestamp,
    pub comment: Option<String>,
    pub operator: Option<String>,
    pub station: Option<String>,
}

/// Filters for listing events. All are optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub shift_id: Option<DbId>,
    pub line_id: Option<DbId>,
    pub event_type: Option<EventType>,
    /// Inclusive lower bound on `occurred_at`.
    pub from: Option<Timestamp>,
    /// Exclusive upper bound on `occurred_at`.
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EventFilter {
    /// Whether a row satisfies every set filter (limit/offset aside).
    pub fn matches(&self, row: &ProductionEventRow) -> bool {
        self.shift_id.map_or(true, |id| row.shift_id == id)
            && self.line_id.map_or(true, |id| row.line_id == id)
            && self
                .event_type
                .map_or(true, |ty| row.event_type == ty.as_str())
            && self.from.map_or(true, |from| row.occurred_at >= from)
            && self.to.map_or(true, |to| row.occurred_at < to)
    }
}
