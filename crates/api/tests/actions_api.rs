mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, build_test_app, create_demo_shift, demo_org_and_line, get_auth, login,
    patch_json_auth, post_json_auth,
};
use serde_json::{json, Value};

async fn create_action(app: &Router, cookie: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), "/api/actions", cookie, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["action"].clone()
}

fn action_body(org_id: i64, line_id: i64, action: &str, due_date: &str) -> Value {
    json!({
        "org_id": org_id,
        "line_id": line_id,
        "action": action,
        "root_cause": "Worn die",
        "owner": "Maintenance",
        "due_date": due_date
    })
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_action_defaults_to_open() {
    let app = build_test_app().await;
    let cookie = login(&app).await;
    let (org_id, line_id) = demo_org_and_line(&app, &cookie).await;

    let action = create_action(
        &app,
        &cookie,
        action_body(org_id, line_id, "Replace die", "2025-03-20"),
    )
    .await;
    assert_eq!(action["status"], "open");
    assert_eq!(action["due_date"], "2025-03-20");
    assert!(action["closed_at"].is_null());
    assert_eq!(action["evidence_event_ids"], json!([]));
}

#[tokio::test]
async fn create_action_records_ai_provenance() {
    let app = build_test_app().await;
    let cookie = login(&app).await;
    let (org_id, line_id) = demo_org_and_line(&app, &cookie).await;
    let shift_id = create_demo_shift(&app, &cookie, org_id).await;

    let mut body = action_body(org_id, line_id, "Standardize setup", "2025-03-21");
    body["shift_id"] = json!(shift_id);
    body["ai_source"] = json!({
        "confidence": "High",
        "expected_impact": "-10 min/shift changeover",
        "evidence_event_ids": [7, 8]
    });

    let action = create_action(&app, &cookie, body).await;
    assert_eq!(action["shift_id"], shift_id);
    assert_eq!(action["ai_confidence"], "high");
    assert_eq!(action["ai_expected_impact"], "-10 min/shift changeover");
    assert_eq!(action["evidence_event_ids"], json!([7, 8]));
}

#[tokio::test]
async fn create_action_requires_text_fields() {
    let app = build_test_app().await;
    let cookie = login(&app).await;
    let (org_id, line_id) = demo_org_and_line(&app, &cookie).await;

    let mut body = action_body(org_id, line_id, "Replace die", "2025-03-20");
    body["owner"] = json!("  ");

    let response = post_json_auth(app, "/api/actions", &cookie, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "owner is required");
}

#[tokio::test]
async fn create_action_for_unknown_line_returns_404() {
    let app = build_test_app().await;
    let cookie = login(&app).await;
    let (org_id, _) = demo_org_and_line(&app, &cookie).await;

    let response = post_json_auth(
        app,
        "/api/actions",
        &cookie,
        action_body(org_id, 999_999, "Replace die", "2025-03-20"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_defaults_to_open_and_delayed_sorted_by_due_date() {
    let app = build_test_app().await;
    let cookie = login(&app).await;
    let (org_id, line_id) = demo_org_and_line(&app, &cookie).await;

    let later = create_action(
        &app,
        &cookie,
        action_body(org_id, line_id, "Later", "2025-04-01"),
    )
    .await;
    let sooner = create_action(
        &app,
        &cookie,
        action_body(org_id, line_id, "Sooner", "2025-03-15"),
    )
    .await;
    let mut closed_body = action_body(org_id, line_id, "Done", "2025-03-10");
    closed_body["status"] = json!("closed");
    create_action(&app, &cookie, closed_body).await;

    let json = body_json(
        get_auth(
            app.clone(),
            &format!("/api/actions?org_id={org_id}"),
            &cookie,
        )
        .await,
    )
    .await;
    let ids: Vec<&Value> = json["actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| &a["id"])
        .collect();
    assert_eq!(ids, vec![&sooner["id"], &later["id"]]);

    let json = body_json(
        get_auth(
            app,
            &format!("/api/actions?org_id={org_id}&status=closed"),
            &cookie,
        )
        .await,
    )
    .await;
    let actions = json["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["action"], "Done");
}

#[tokio::test]
async fn list_with_unknown_status_returns_400() {
    let app = build_test_app().await;
    let cookie = login(&app).await;

    let response = get_auth(app, "/api/actions?status=open,paused", &cookie).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn closing_stamps_closed_at_and_reopening_clears_it() {
    let app = build_test_app().await;
    let cookie = login(&app).await;
    let (org_id, line_id) = demo_org_and_line(&app, &cookie).await;
    let action = create_action(
        &app,
        &cookie,
        action_body(org_id, line_id, "Replace die", "2025-03-20"),
    )
    .await;
    let uri = format!("/api/actions/{}/status", action["id"]);

    let response = patch_json_auth(app.clone(), &uri, &cookie, json!({ "status": "closed" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let closed = body_json(response).await["action"].clone();
    assert_eq!(closed["status"], "closed");
    assert!(closed["closed_at"].is_string());

    let response = patch_json_auth(app, &uri, &cookie, json!({ "status": "Open" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reopened = body_json(response).await["action"].clone();
    assert_eq!(reopened["status"], "open");
    assert!(reopened["closed_at"].is_null());
}

#[tokio::test]
async fn invalid_status_returns_400() {
    let app = build_test_app().await;
    let cookie = login(&app).await;
    let (org_id, line_id) = demo_org_and_line(&app, &cookie).await;
    let action = create_action(
        &app,
        &cookie,
        action_body(org_id, line_id, "Replace die", "2025-03-20"),
    )
    .await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/actions/{}/status", action["id"]),
        &cookie,
        json!({ "status": "paused" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid status 'paused'"));

    let response = patch_json_auth(
        app,
        &format!("/api/actions/{}/status", action["id"]),
        &cookie,
        json!({ "state": "closed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("status"));
}

#[tokio::test]
async fn status_change_on_unknown_action_returns_404() {
    let app = build_test_app().await;
    let cookie = login(&app).await;

    let response = patch_json_auth(
        app,
        "/api/actions/999999/status",
        &cookie,
        json!({ "status": "closed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "ActionPlan with id 999999 not found"
    );
}
