//! Behaviour of the in-memory store.
//!
//! These mirror the ordering, filtering and status-stamping rules the
//! PostgreSQL repositories implement in SQL, so the API behaves the same
//! against either backend.

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use leanline_core::action_plan::{ActionStatus, AiSource};
use leanline_core::ai::Confidence;
use leanline_core::event::{EventKind, EventType};
use leanline_core::paging::MAX_LIST_LIMIT;
use leanline_core::shift::ShiftInputs;
use leanline_core::types::{DbId, Timestamp};
use leanline_db::models::action_plan::{ActionPlanFilter, CreateActionPlan};
use leanline_db::models::event::{CreateProductionEvent, EventFilter};
use leanline_db::models::production_line::CreateProductionLine;
use leanline_db::models::shift::CreateShift;
use leanline_db::{MemoryStore, Store};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
}

fn new_shift(org_id: DbId, name: Option<&str>, started_at: Timestamp) -> CreateShift {
    CreateShift {
        org_id,
        line_id: None,
        shift_name: name.map(str::to_string),
        started_at,
        inputs: ShiftInputs {
            planned_time_min: 480,
            ideal_cycle_sec: 12.0,
            output_units: 420,
            scrap_units: 18,
        },
    }
}

fn new_event(shift_id: DbId, line_id: DbId, kind: EventKind, occurred_at: Timestamp) -> CreateProductionEvent {
    CreateProductionEvent {
        shift_id,
        line_id,
        kind,
        category: " Machine ".to_string(),
        occurred_at,
        comment: None,
        operator: None,
        station: None,
    }
}

fn new_plan(org_id: DbId, line_id: DbId, due: (i32, u32, u32)) -> CreateActionPlan {
    CreateActionPlan {
        org_id,
        line_id,
        shift_id: None,
        action: "Replace worn belt".to_string(),
        root_cause: "Belt past service life".to_string(),
        owner: "maintenance".to_string(),
        due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap(),
        status: None,
        ai_source: None,
    }
}

async fn demo_org_and_line(store: &MemoryStore) -> (DbId, DbId) {
    let org = store.list_organizations().await.unwrap().remove(0);
    let line = store.list_lines(org.id).await.unwrap().remove(0);
    (org.id, line.id)
}

// ---------------------------------------------------------------------------
// Organizations and lines
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_store_has_demo_factory_with_three_lines() {
    let store = MemoryStore::seeded().await.unwrap();
    assert_eq!(store.backend(), "memory");

    let orgs = store.list_organizations().await.unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].name, "Demo Factory");

    let lines = store.list_lines(orgs[0].id).await.unwrap();
    let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Line 1 - Press", "Line 2 - Assembly", "Line 3 - Pack"]);
    assert_eq!(lines[0].status, "running");
    assert_eq!(lines[0].output_per_hour, Some(120));
}

#[tokio::test]
async fn line_status_defaults_to_idle() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, _) = demo_org_and_line(&store).await;

    let line = store
        .create_line(
            org_id,
            &CreateProductionLine {
                name: "  Line 4 - Weld ".to_string(),
                status: None,
                output_per_hour: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(line.name, "Line 4 - Weld");
    assert_eq!(line.status, "idle");
    assert_matches!(store.find_line(line.id).await.unwrap(), Some(l) if l.org_id == org_id);
}

#[tokio::test]
async fn unknown_ids_are_none() {
    let store = MemoryStore::new();
    assert!(store.find_organization(1).await.unwrap().is_none());
    assert!(store.find_shift(1).await.unwrap().is_none());
    assert!(store.latest_shift(1).await.unwrap().is_none());
    assert!(store
        .update_action_status(1, ActionStatus::Closed)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Shifts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn latest_shift_is_most_recently_started() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, _) = demo_org_and_line(&store).await;

    let late = store
        .create_shift(&new_shift(org_id, Some("Night"), at(22, 0)))
        .await
        .unwrap();
    // Created later but started earlier.
    store
        .create_shift(&new_shift(org_id, None, at(6, 0)))
        .await
        .unwrap();

    let latest = store.latest_shift(org_id).await.unwrap().unwrap();
    assert_eq!(latest.id, late.id);
    assert_eq!(latest.shift_name, "Night");
}

#[tokio::test]
async fn blank_shift_name_defaults() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, _) = demo_org_and_line(&store).await;

    let shift = store
        .create_shift(&new_shift(org_id, Some("   "), at(6, 0)))
        .await
        .unwrap();
    assert_eq!(shift.shift_name, "A");
    assert_eq!(shift.inputs().planned_time_min, 480);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn events_are_listed_oldest_first_and_filtered() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, line_id) = demo_org_and_line(&store).await;
    let shift = store
        .create_shift(&new_shift(org_id, None, at(6, 0)))
        .await
        .unwrap();

    let second = store
        .create_event(&new_event(
            shift.id,
            line_id,
            EventKind::Scrap { qty: 4 },
            at(9, 0),
        ))
        .await
        .unwrap();
    let first = store
        .create_event(&new_event(
            shift.id,
            line_id,
            EventKind::Downtime { duration_min: 12 },
            at(7, 30),
        ))
        .await
        .unwrap();
    assert_eq!(first.category, "Machine");
    assert_eq!(first.duration_min, Some(12));
    assert_eq!(first.qty, None);

    let all = store
        .list_events(&EventFilter {
            shift_id: Some(shift.id),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<DbId> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let scrap = store
        .list_events(&EventFilter {
            event_type: Some(EventType::Scrap),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(scrap.len(), 1);
    assert_eq!(scrap[0].id, second.id);

    let window = store
        .list_events(&EventFilter {
            from: Some(at(7, 30)),
            to: Some(at(9, 0)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(window.len(), 1, "from is inclusive, to is exclusive");
    assert_eq!(window[0].id, first.id);
}

#[tokio::test]
async fn event_paging_applies_offset_then_limit() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, line_id) = demo_org_and_line(&store).await;
    let shift = store
        .create_shift(&new_shift(org_id, None, at(6, 0)))
        .await
        .unwrap();
    for i in 0..5 {
        store
            .create_event(&new_event(
                shift.id,
                line_id,
                EventKind::Note,
                at(7, 0) + Duration::minutes(i),
            ))
            .await
            .unwrap();
    }

    let page = store
        .list_events(&EventFilter {
            limit: Some(2),
            offset: Some(3),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].occurred_at, at(7, 3));

    let clamped = store
        .list_events(&EventFilter {
            limit: Some(0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(clamped.len(), 1, "limit is clamped to at least one row");
}

#[tokio::test]
async fn events_for_shift_returns_every_event_unpaged() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, line_id) = demo_org_and_line(&store).await;
    let shift = store
        .create_shift(&new_shift(org_id, None, at(6, 0)))
        .await
        .unwrap();
    let other = store
        .create_shift(&new_shift(org_id, Some("B"), at(14, 0)))
        .await
        .unwrap();

    let late = store
        .create_event(&new_event(
            shift.id,
            line_id,
            EventKind::Downtime { duration_min: 12 },
            at(9, 0),
        ))
        .await
        .unwrap();
    for _ in 0..MAX_LIST_LIMIT {
        store
            .create_event(&new_event(shift.id, line_id, EventKind::Note, at(7, 0)))
            .await
            .unwrap();
    }
    store
        .create_event(&new_event(other.id, line_id, EventKind::Note, at(15, 0)))
        .await
        .unwrap();

    let events = store.events_for_shift(shift.id).await.unwrap();
    assert_eq!(events.len() as i64, MAX_LIST_LIMIT + 1);
    assert!(events.iter().all(|e| e.shift_id == shift.id));
    assert_eq!(events.last().unwrap().id, late.id, "oldest first");

    assert!(store.events_for_shift(999_999).await.unwrap().is_empty());
}

#[tokio::test]
async fn stored_event_converts_to_domain() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, line_id) = demo_org_and_line(&store).await;
    let shift = store
        .create_shift(&new_shift(org_id, None, at(6, 0)))
        .await
        .unwrap();
    let row = store
        .create_event(&new_event(
            shift.id,
            line_id,
            EventKind::Changeover { duration_min: 18 },
            at(8, 0),
        ))
        .await
        .unwrap();

    let event = row.to_domain().unwrap();
    assert_eq!(event.id, row.id);
    assert_eq!(event.kind, EventKind::Changeover { duration_min: 18 });
    assert_eq!(event.timestamp, at(8, 0));
}

// ---------------------------------------------------------------------------
// Action plans
// ---------------------------------------------------------------------------

#[tokio::test]
async fn action_plans_default_open_and_sort_by_due_date() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, line_id) = demo_org_and_line(&store).await;

    let later = store
        .create_action_plan(&new_plan(org_id, line_id, (2025, 4, 1)))
        .await
        .unwrap();
    let sooner = store
        .create_action_plan(&new_plan(org_id, line_id, (2025, 3, 15)))
        .await
        .unwrap();
    assert_eq!(later.status, "open");
    assert!(later.closed_at.is_none());

    let listed = store
        .list_action_plans(&ActionPlanFilter {
            org_id: Some(org_id),
            line_id: None,
            statuses: vec![ActionStatus::Open, ActionStatus::Delayed],
        })
        .await
        .unwrap();
    let ids: Vec<DbId> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);
}

#[tokio::test]
async fn closing_stamps_and_reopening_clears_closed_at() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, line_id) = demo_org_and_line(&store).await;
    let plan = store
        .create_action_plan(&new_plan(org_id, line_id, (2025, 3, 15)))
        .await
        .unwrap();

    let closed = store
        .update_action_status(plan.id, ActionStatus::Closed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(closed.status, "closed");
    let stamped = closed.closed_at.expect("closed_at set on close");

    let again = store
        .update_action_status(plan.id, ActionStatus::Closed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.closed_at, Some(stamped), "re-closing keeps the first stamp");

    let reopened = store
        .update_action_status(plan.id, ActionStatus::Delayed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.status, "delayed");
    assert!(reopened.closed_at.is_none());

    let closed_only = store
        .list_action_plans(&ActionPlanFilter {
            org_id: None,
            line_id: Some(line_id),
            statuses: vec![ActionStatus::Closed],
        })
        .await
        .unwrap();
    assert!(closed_only.is_empty());
}

#[tokio::test]
async fn ai_source_is_recorded() {
    let store = MemoryStore::seeded().await.unwrap();
    let (org_id, line_id) = demo_org_and_line(&store).await;

    let mut input = new_plan(org_id, line_id, (2025, 3, 15));
    input.status = Some(ActionStatus::Closed);
    input.ai_source = Some(AiSource {
        confidence: Some(Confidence::High),
        expected_impact: Some("+3-5% OEE".to_string()),
        evidence_event_ids: vec![11, 12],
    });

    let plan = store.create_action_plan(&input).await.unwrap();
    assert_eq!(plan.ai_confidence.as_deref(), Some("high"));
    assert_eq!(plan.ai_expected_impact.as_deref(), Some("+3-5% OEE"));
    assert_eq!(plan.evidence_event_ids, vec![11, 12]);
    assert!(plan.closed_at.is_some(), "created closed is stamped immediately");
}
