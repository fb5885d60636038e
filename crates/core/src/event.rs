//! Production events and ingest validation.
//!
//! An event's type decides which measurement it carries: downtime and
//! changeover record a duration, scrap and quality record a quantity, notes
//! carry neither. [`EventKind`] encodes that as a tagged union; the flat
//! [`EventDraft`] received over the wire is checked by [`validate_event`]
//! before it becomes one.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Longest plausible single downtime/changeover, in minutes (one shift).
pub const MAX_DURATION_MIN: i32 = 480;

/// Largest plausible scrap/quality quantity for a single event.
pub const MAX_QTY: i32 = 100_000;

/// Maximum length of the free-form category label.
pub const MAX_CATEGORY_LENGTH: usize = 64;

/// Event type names accepted on ingest and used as the `event_type` column.
pub const VALID_EVENT_TYPES: &[&str] = &["downtime", "changeover", "scrap", "quality", "note"];

/// Suggested category labels per event type, served by `GET /api/ingest/categories`.
///
/// Categories stay free-form; these are not enforced.
pub const SUGGESTED_CATEGORIES: &[(EventType, &[&str])] = &[
    (
        EventType::Downtime,
        &["Machine", "sensor_fault", "jam", "maintenance", "no_material", "no_operator", "other"],
    ),
    (
        EventType::Changeover,
        &["tooling", "program", "material", "setup", "first_off_approval", "other"],
    ),
    (
        EventType::Scrap,
        &["warped_material", "dimension_oos", "surface_defect", "wrong_part", "other"],
    ),
    (
        EventType::Quality,
        &["audit_fail", "rework", "containment", "customer_return", "other"],
    ),
    (EventType::Note, &["shift_note", "handover", "safety", "5s", "other"]),
];

/// Discriminant of a production event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[serde(alias = "Downtime")]
    Downtime,
    #[serde(alias = "Changeover")]
    Changeover,
    #[serde(alias = "Scrap")]
    Scrap,
    #[serde(alias = "Quality")]
    Quality,
    #[serde(alias = "Note")]
    Note,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Downtime => "downtime",
            EventType::Changeover => "changeover",
            EventType::Scrap => "scrap",
            EventType::Quality => "quality",
            EventType::Note => "note",
        }
    }

    /// Parse a type name. Matching is case-insensitive so `"Downtime"` and
    /// `"downtime"` are both accepted.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "downtime" => Some(EventType::Downtime),
            "changeover" => Some(EventType::Changeover),
            "scrap" => Some(EventType::Scrap),
            "quality" => Some(EventType::Quality),
            "note" => Some(EventType::Note),
            _ => None,
        }
    }

    /// Downtime and changeover consume planned time and must carry a duration.
    pub fn requires_duration(self) -> bool {
        matches!(self, EventType::Downtime | EventType::Changeover)
    }

    /// Scrap and quality events count units and must carry a quantity.
    pub fn requires_qty(self) -> bool {
        matches!(self, EventType::Scrap | EventType::Quality)
    }
}

/// The type-specific payload of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Downtime { duration_min: i32 },
    Changeover { duration_min: i32 },
    Scrap { qty: i32 },
    Quality { qty: i32 },
    Note,
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Downtime { .. } => EventType::Downtime,
            EventKind::Changeover { .. } => EventType::Changeover,
            EventKind::Scrap { .. } => EventType::Scrap,
            EventKind::Quality { .. } => EventType::Quality,
            EventKind::Note => EventType::Note,
        }
    }

    pub fn duration_min(&self) -> Option<i32> {
        match *self {
            EventKind::Downtime { duration_min } | EventKind::Changeover { duration_min } => {
                Some(duration_min)
            }
            _ => None,
        }
    }

    pub fn qty(&self) -> Option<i32> {
        match *self {
            EventKind::Scrap { qty } | EventKind::Quality { qty } => Some(qty),
            _ => None,
        }
    }

    /// Rebuild a kind from its stored columns.
    ///
    /// Used when loading rows; the database CHECK constraints mirror these
    /// rules so a failure here means the row was written outside the API.
    pub fn from_parts(
        event_type: &str,
        duration_min: Option<i32>,
        qty: Option<i32>,
    ) -> Result<Self, String> {
        let ty = EventType::parse(event_type)
            .ok_or_else(|| format!("Unknown event type '{event_type}'"))?;
        let kind = match (ty, duration_min, qty) {
            (EventType::Downtime, Some(duration_min), None) => EventKind::Downtime { duration_min },
            (EventType::Changeover, Some(duration_min), None) => {
                EventKind::Changeover { duration_min }
            }
            (EventType::Scrap, None, Some(qty)) => EventKind::Scrap { qty },
            (EventType::Quality, None, Some(qty)) => EventKind::Quality { qty },
            (EventType::Note, None, None) => EventKind::Note,
            _ => {
                return Err(format!(
                    "Inconsistent measurements for event type '{}'",
                    ty.as_str()
                ))
            }
        };
        Ok(kind)
    }
}

/// A recorded production event, as consumed by the metrics and findings
/// engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEvent {
    pub id: DbId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: EventKind,
    pub category: String,
    pub comment: Option<String>,
    pub operator: Option<String>,
    pub station: Option<String>,
}

/// An event as submitted on ingest, before validation.
///
/// Numeric fields are read as `f64` so that a fractional duration is reported
/// as a validation message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    #[serde(rename = "type")]
    pub event_type: String,
    pub line_id: Option<DbId>,
    pub timestamp: Option<Timestamp>,
    pub category: Option<String>,
    pub duration_min: Option<f64>,
    pub qty: Option<f64>,
    pub comment: Option<String>,
    pub operator: Option<String>,
    pub station: Option<String>,
}

/// Validate an ingest draft and return the typed payload it describes.
///
/// Checks run in a fixed order and the first failure is returned, so the
/// message always names a single field.
pub fn validate_event(draft: &EventDraft) -> Result<EventKind, String> {
    let ty = EventType::parse(&draft.event_type).ok_or_else(|| {
        format!(
            "Invalid event type '{}'. Must be one of: {}",
            draft.event_type,
            VALID_EVENT_TYPES.join(", ")
        )
    })?;

    if draft.line_id.is_none() {
        return Err("Line is required.".to_string());
    }
    if draft.timestamp.is_none() {
        return Err("Timestamp is required.".to_string());
    }
    validate_category(draft.category.as_deref())?;

    let duration = if ty.requires_duration() {
        let d = positive_int(draft.duration_min).ok_or_else(|| {
            "Duration (min) must be a positive integer for downtime/changeover.".to_string()
        })?;
        if d > MAX_DURATION_MIN {
            return Err(format!(
                "Duration looks unrealistic (> {MAX_DURATION_MIN} min). Check input."
            ));
        }
        Some(d)
    } else if draft.duration_min.is_some() {
        return Err("Duration should be empty for this event type.".to_string());
    } else {
        None
    };

    let qty = if ty.requires_qty() {
        let q = positive_int(draft.qty).ok_or_else(|| {
            "Qty must be a positive integer for scrap/quality.".to_string()
        })?;
        if q > MAX_QTY {
            return Err("Qty looks unrealistic. Check input.".to_string());
        }
        Some(q)
    } else if draft.qty.is_some() {
        return Err("Qty should be empty for this event type.".to_string());
    } else {
        None
    };

    EventKind::from_parts(ty.as_str(), duration, qty)
}

/// Validate the free-form category label.
pub fn validate_category(category: Option<&str>) -> Result<(), String> {
    let category = category.map(str::trim).unwrap_or_default();
    if category.is_empty() {
        return Err("Category is required.".to_string());
    }
    if category.chars().count() > MAX_CATEGORY_LENGTH {
        return Err(format!(
            "Category exceeds maximum length of {MAX_CATEGORY_LENGTH} characters"
        ));
    }
    Ok(())
}

/// `Some(n)` when `value` is a whole number in `1..=i32::MAX`.
fn positive_int(value: Option<f64>) -> Option<i32> {
    let v = value?;
    if v.fract() != 0.0 || v < 1.0 || v > f64::from(i32::MAX) {
        return None;
    }
    Some(v as i32)
}
