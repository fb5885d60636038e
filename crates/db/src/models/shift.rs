//! Shift header model.

use leanline_core::shift::ShiftInputs;
use leanline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `shifts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Shift {
    pub id: DbId,
    pub org_id: DbId,
    pub line_id: Option<DbId>,
    pub shift_name: String,
    pub started_at: Timestamp,
    pub planned_time_min: i32,
    pub ideal_cycle_sec: f64,
    pub output_units: i32,
    pub scrap_units: i32,
    pub created_at: Timestamp,
}

impl Shift {
    /// The targets and actuals the metrics deriver works from.
    pub fn inputs(&self) -> ShiftInputs {
        ShiftInputs {
            planned_time_min: self.planned_time_min,
            ideal_cycle_sec: self.ideal_cycle_sec,
            output_units: self.output_units,
            scrap_units: self.scrap_units,
        }
    }
}

/// DTO for creating a shift header.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShift {
    pub org_id: DbId,
    pub line_id: Option<DbId>,
    pub shift_name: Option<String>,
    pub started_at: Timestamp,
    #[serde(flatten)]
    pub inputs: ShiftInputs,
}
