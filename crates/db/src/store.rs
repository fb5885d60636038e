//! The persistence seam used by the API.
//!
//! Handlers depend on `Arc<dyn Store>` rather than a concrete pool so the
//! server can run against PostgreSQL in production and against
//! [`crate::memory::MemoryStore`] in tests or when no database is configured.
//! Both report failures as [`sqlx::Error`] so the HTTP layer classifies them
//! in one place.

use async_trait::async_trait;
use leanline_core::action_plan::ActionStatus;
use leanline_core::types::DbId;

use crate::models::action_plan::{ActionPlan, ActionPlanFilter, CreateActionPlan};
use crate::models::event::{CreateProductionEvent, EventFilter, ProductionEventRow};
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::production_line::{CreateProductionLine, ProductionLine};
use crate::models::shift::{CreateShift, Shift};
use crate::repositories::{
    ActionPlanRepo, EventRepo, OrganizationRepo, ProductionLineRepo, ShiftRepo,
};
use crate::DbPool;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> StoreResult<()>;

    // -- organizations / lines --

    async fn create_organization(&self, input: &CreateOrganization) -> StoreResult<Organization>;
    async fn find_organization(&self, id: DbId) -> StoreResult<Option<Organization>>;
    async fn list_organizations(&self) -> StoreResult<Vec<Organization>>;
    async fn create_line(
        &self,
        org_id: DbId,
        input: &CreateProductionLine,
    ) -> StoreResult<ProductionLine>;
    async fn find_line(&self, id: DbId) -> StoreResult<Option<ProductionLine>>;
    async fn list_lines(&self, org_id: DbId) -> StoreResult<Vec<ProductionLine>>;

    // -- shifts --

    async fn create_shift(&self, input: &CreateShift) -> StoreResult<Shift>;
    async fn find_shift(&self, id: DbId) -> StoreResult<Option<Shift>>;
    async fn latest_shift(&self, org_id: DbId) -> StoreResult<Option<Shift>>;

    // -- events --

    async fn create_event(&self, input: &CreateProductionEvent) -> StoreResult<ProductionEventRow>;
    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<ProductionEventRow>>;
    /// Every event of a shift, oldest first. Not paged.
    async fn events_for_shift(&self, shift_id: DbId) -> StoreResult<Vec<ProductionEventRow>>;

    // -- action plans --

    async fn create_action_plan(&self, input: &CreateActionPlan) -> StoreResult<ActionPlan>;
    async fn list_action_plans(&self, filter: &ActionPlanFilter) -> StoreResult<Vec<ActionPlan>>;
    async fn update_action_status(
        &self,
        id: DbId,
        status: ActionStatus,
    ) -> StoreResult<Option<ActionPlan>>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await
    }

    async fn create_organization(&self, input: &CreateOrganization) -> StoreResult<Organization> {
        OrganizationRepo::create(&self.pool, input).await
    }

    async fn find_organization(&self, id: DbId) -> StoreResult<Option<Organization>> {
        OrganizationRepo::find_by_id(&self.pool, id).await
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        OrganizationRepo::list(&self.pool).await
    }

    async fn create_line(
        &self,
        org_id: DbId,
        input: &CreateProductionLine,
    ) -> StoreResult<ProductionLine> {
        ProductionLineRepo::create(&self.pool, org_id, input).await
    }

    async fn find_line(&self, id: DbId) -> StoreResult<Option<ProductionLine>> {
        ProductionLineRepo::find_by_id(&self.pool, id).await
    }

    async fn list_lines(&self, org_id: DbId) -> StoreResult<Vec<ProductionLine>> {
        ProductionLineRepo::list_by_org(&self.pool, org_id).await
    }

    async fn create_shift(&self, input: &CreateShift) -> StoreResult<Shift> {
        ShiftRepo::create(&self.pool, input).await
    }

    async fn find_shift(&self, id: DbId) -> StoreResult<Option<Shift>> {
        ShiftRepo::find_by_id(&self.pool, id).await
    }

    async fn latest_shift(&self, org_id: DbId) -> StoreResult<Option<Shift>> {
        ShiftRepo::latest_for_org(&self.pool, org_id).await
    }

    async fn create_event(&self, input: &CreateProductionEvent) -> StoreResult<ProductionEventRow> {
        EventRepo::create(&self.pool, input).await
    }

    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<ProductionEventRow>> {
        EventRepo::list(&self.pool, filter).await
    }

    async fn events_for_shift(&self, shift_id: DbId) -> StoreResult<Vec<ProductionEventRow>> {
        EventRepo::list_for_shift(&self.pool, shift_id).await
    }

    async fn create_action_plan(&self, input: &CreateActionPlan) -> StoreResult<ActionPlan> {
        ActionPlanRepo::create(&self.pool, input).await
    }

    async fn list_action_plans(&self, filter: &ActionPlanFilter) -> StoreResult<Vec<ActionPlan>> {
        ActionPlanRepo::list(&self.pool, filter).await
    }

    async fn update_action_status(
        &self,
        id: DbId,
        status: ActionStatus,
    ) -> StoreResult<Option<ActionPlan>> {
        ActionPlanRepo::update_status(&self.pool, id, status).await
    }
}
