//! Repository for the `production_events` table.

use leanline_core::paging::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use leanline_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateProductionEvent, EventFilter, ProductionEventRow};

/// Column list for production_events queries.
const COLUMNS: &str = "id, shift_id, line_id, event_type, duration_min, qty, category, \
    occurred_at, comment, operator, station, created_at";

/// Provides insert and filtered listing for production events.
/// Events are never updated after ingest.
pub struct EventRepo;

impl EventRepo {
    /// Insert a validated event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProductionEvent,
    ) -> Result<ProductionEventRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO production_events
                (shift_id, line_id, event_type, duration_min, qty, category,
                 occurred_at, comment, operator, station)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionEventRow>(&query)
            .bind(input.shift_id)
            .bind(input.line_id)
            .bind(input.kind.event_type().as_str())
            .bind(input.kind.duration_min())
            .bind(input.kind.qty())
            .bind(input.category.trim())
            .bind(input.occurred_at)
            .bind(&input.comment)
            .bind(&input.operator)
            .bind(&input.station)
            .fetch_one(pool)
            .await
    }

    /// List events matching the filter, oldest first.
    ///
    /// Unset filters are passed as NULL and short-circuit their predicate.
    pub async fn list(
        pool: &PgPool,
        filter: &EventFilter,
    ) -> Result<Vec<ProductionEventRow>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM production_events
             WHERE ($1::BIGINT IS NULL OR shift_id = $1)
               AND ($2::BIGINT IS NULL OR line_id = $2)
               AND ($3::TEXT IS NULL OR event_type = $3)
               AND ($4::TIMESTAMPTZ IS NULL OR occurred_at >= $4)
               AND ($5::TIMESTAMPTZ IS NULL OR occurred_at < $5)
             ORDER BY occurred_at, id
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, ProductionEventRow>(&query)
            .bind(filter.shift_id)
            .bind(filter.line_id)
            .bind(filter.event_type.map(|t| t.as_str()))
            .bind(filter.from)
            .bind(filter.to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All events of one shift, oldest first, with no limit.
    pub async fn list_for_shift(
        pool: &PgPool,
        shift_id: DbId,
    ) -> Result<Vec<ProductionEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM production_events
             WHERE shift_id = $1
             ORDER BY occurred_at, id"
        );
        sqlx::query_as::<_, ProductionEventRow>(&query)
            .bind(shift_id)
            .fetch_all(pool)
            .await
    }
}
