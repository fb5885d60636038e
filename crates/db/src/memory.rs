//! In-process [`Store`] implementation.
//!
//! Used by the test suites and by the server when `DATABASE_URL` is unset.
//! All tables live behind one `RwLock`; ids come from a single counter so
//! they are unique across tables, like BIGSERIAL within each. Data is lost
//! when the store is dropped.

use async_trait::async_trait;
use chrono::Utc;
use leanline_core::action_plan::ActionStatus;
use leanline_core::org::DEFAULT_LINE_STATUS;
use leanline_core::paging::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use leanline_core::shift::normalize_shift_name;
use leanline_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::action_plan::{ActionPlan, ActionPlanFilter, CreateActionPlan};
use crate::models::event::{CreateProductionEvent, EventFilter, ProductionEventRow};
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::production_line::{CreateProductionLine, ProductionLine};
use crate::models::shift::{CreateShift, Shift};
use crate::store::{Store, StoreResult};

#[derive(Default)]
struct Tables {
    last_id: DbId,
    organizations: Vec<Organization>,
    lines: Vec<ProductionLine>,
    shifts: Vec<Shift>,
    events: Vec<ProductionEventRow>,
    action_plans: Vec<ActionPlan>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }
}

/// A [`Store`] holding every table in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the demo factory and its three lines,
    /// matching the seed migration.
    pub async fn seeded() -> StoreResult<Self> {
        let store = Self::new();
        let org = store
            .create_organization(&CreateOrganization {
                name: "Demo Factory".to_string(),
                description: Some("Demo plant for the Lean dashboard".to_string()),
                location: Some("Plant 1".to_string()),
            })
            .await?;
        for (name, status, output_per_hour) in [
            ("Line 1 - Press", "running", 120),
            ("Line 2 - Assembly", "idle", 0),
            ("Line 3 - Pack", "maintenance", 0),
        ] {
            store
                .create_line(
                    org.id,
                    &CreateProductionLine {
                        name: name.to_string(),
                        status: Some(status.to_string()),
                        output_per_hour: Some(output_per_hour),
                    },
                )
                .await?;
        }
        Ok(store)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_organization(&self, input: &CreateOrganization) -> StoreResult<Organization> {
        let mut t = self.tables.write().await;
        let org = Organization {
            id: t.next_id(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            location: input.location.clone(),
            created_at: Utc::now(),
        };
        t.organizations.push(org.clone());
        Ok(org)
    }

    async fn find_organization(&self, id: DbId) -> StoreResult<Option<Organization>> {
        let t = self.tables.read().await;
        Ok(t.organizations.iter().find(|o| o.id == id).cloned())
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        let t = self.tables.read().await;
        let mut orgs = t.organizations.clone();
        orgs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(orgs)
    }

    async fn create_line(
        &self,
        org_id: DbId,
        input: &CreateProductionLine,
    ) -> StoreResult<ProductionLine> {
        let mut t = self.tables.write().await;
        let line = ProductionLine {
            id: t.next_id(),
            org_id,
            name: input.name.trim().to_string(),
            status: input
                .status
                .clone()
                .unwrap_or_else(|| DEFAULT_LINE_STATUS.to_string()),
            output_per_hour: input.output_per_hour,
            created_at: Utc::now(),
        };
        t.lines.push(line.clone());
        Ok(line)
    }

    async fn find_line(&self, id: DbId) -> StoreResult<Option<ProductionLine>> {
        let t = self.tables.read().await;
        Ok(t.lines.iter().find(|l| l.id == id).cloned())
    }

    async fn list_lines(&self, org_id: DbId) -> StoreResult<Vec<ProductionLine>> {
        let t = self.tables.read().await;
        let mut lines: Vec<ProductionLine> =
            t.lines.iter().filter(|l| l.org_id == org_id).cloned().collect();
        lines.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(lines)
    }

    async fn create_shift(&self, input: &CreateShift) -> StoreResult<Shift> {
        let mut t = self.tables.write().await;
        let shift = Shift {
            id: t.next_id(),
            org_id: input.org_id,
            line_id: input.line_id,
            shift_name: normalize_shift_name(input.shift_name.as_deref()),
            started_at: input.started_at,
            planned_time_min: input.inputs.planned_time_min,
            ideal_cycle_sec: input.inputs.ideal_cycle_sec,
            output_units: input.inputs.output_units,
            scrap_units: input.inputs.scrap_units,
            created_at: Utc::now(),
        };
        t.shifts.push(shift.clone());
        Ok(shift)
    }

    async fn find_shift(&self, id: DbId) -> StoreResult<Option<Shift>> {
        let t = self.tables.read().await;
        Ok(t.shifts.iter().find(|s| s.id == id).cloned())
    }

    async fn latest_shift(&self, org_id: DbId) -> StoreResult<Option<Shift>> {
        let t = self.tables.read().await;
        Ok(t.shifts
            .iter()
            .filter(|s| s.org_id == org_id)
            .max_by_key(|s| (s.started_at, s.id))
            .cloned())
    }

    async fn create_event(&self, input: &CreateProductionEvent) -> StoreResult<ProductionEventRow> {
        let mut t = self.tables.write().await;
        let row = ProductionEventRow {
            id: t.next_id(),
            shift_id: input.shift_id,
            line_id: input.line_id,
            event_type: input.kind.event_type().as_str().to_string(),
            duration_min: input.kind.duration_min(),
            qty: input.kind.qty(),
            category: input.category.trim().to_string(),
            occurred_at: input.occurred_at,
            comment: input.comment.clone(),
            operator: input.operator.clone(),
            station: input.station.clone(),
            created_at: Utc::now(),
        };
        t.events.push(row.clone());
        Ok(row)
    }

    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<ProductionEventRow>> {
        let limit = clamp_limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT) as usize;
        let offset = clamp_offset(filter.offset) as usize;

        let t = self.tables.read().await;
        let mut rows: Vec<ProductionEventRow> =
            t.events.iter().filter(|e| filter.matches(e)).cloned().collect();
        rows.sort_by_key(|e| (e.occurred_at, e.id));
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn events_for_shift(&self, shift_id: DbId) -> StoreResult<Vec<ProductionEventRow>> {
        let t = self.tables.read().await;
        let mut rows: Vec<ProductionEventRow> = t
            .events
            .iter()
            .filter(|e| e.shift_id == shift_id)
            .cloned()
            .collect();
        rows.sort_by_key(|e| (e.occurred_at, e.id));
        Ok(rows)
    }

    async fn create_action_plan(&self, input: &CreateActionPlan) -> StoreResult<ActionPlan> {
        let mut t = self.tables.write().await;
        let status = input.status();
        let now = Utc::now();
        let plan = ActionPlan {
            id: t.next_id(),
            org_id: input.org_id,
            line_id: input.line_id,
            shift_id: input.shift_id,
            action: input.action.trim().to_string(),
            root_cause: input.root_cause.trim().to_string(),
            owner: input.owner.trim().to_string(),
            due_date: input.due_date,
            status: status.as_str().to_string(),
            ai_confidence: input.ai_confidence(),
            ai_expected_impact: input.ai_expected_impact(),
            evidence_event_ids: input.evidence_event_ids(),
            created_at: now,
            closed_at: status.is_closed().then_some(now),
        };
        t.action_plans.push(plan.clone());
        Ok(plan)
    }

    async fn list_action_plans(&self, filter: &ActionPlanFilter) -> StoreResult<Vec<ActionPlan>> {
        let t = self.tables.read().await;
        let mut plans: Vec<ActionPlan> = t
            .action_plans
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        plans.sort_by_key(|p| (p.due_date, p.id));
        Ok(plans)
    }

    async fn update_action_status(
        &self,
        id: DbId,
        status: ActionStatus,
    ) -> StoreResult<Option<ActionPlan>> {
        let mut t = self.tables.write().await;
        let Some(plan) = t.action_plans.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        plan.status = status.as_str().to_string();
        plan.closed_at = if status.is_closed() {
            plan.closed_at.or_else(|| Some(Utc::now()))
        } else {
            None
        };
        Ok(Some(plan.clone()))
    }
}
