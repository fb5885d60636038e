#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use leanline_api::ai::openai::AiConfig;
use leanline_api::ai::{AiError, CompletionProvider};
use leanline_api::auth::session::SessionConfig;
use leanline_api::config::{DemoCredentials, ServerConfig};
use leanline_api::router::build_app_router;
use leanline_api::state::AppState;
use leanline_db::MemoryStore;

pub const DEMO_EMAIL: &str = "demo@factory.com";
pub const DEMO_PASSWORD: &str = "demo1234";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        session: SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            ttl_hours: 8,
            secure_cookie: false,
        },
        demo: DemoCredentials {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        },
        ai: AiConfig {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Stub completion provider
// ---------------------------------------------------------------------------

/// What the stub answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    NotConfigured,
    Upstream(String),
}

/// A [`CompletionProvider`] returning a canned reply and recording prompts.
pub struct StubProvider {
    reply: Mutex<StubReply>,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::new(StubReply::Text(text.to_string()))
    }

    /// Change the reply for subsequent calls.
    pub fn set_text(&self, text: &str) {
        *self.reply.lock().unwrap() = StubReply::Text(text.to_string());
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            StubReply::Text(text) => Ok(text),
            StubReply::NotConfigured => Err(AiError::NotConfigured),
            StubReply::Upstream(message) => Err(AiError::Upstream {
                status: 401,
                message,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router over a seeded in-memory store and the
/// given completion provider.
pub async fn build_test_app_with(ai: Arc<StubProvider>) -> Router {
    let config = test_config();
    let store = MemoryStore::seeded()
        .await
        .expect("seeding the memory store should succeed");

    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config.clone()),
        ai,
    };
    build_app_router(state, &config)
}

/// [`build_test_app_with`] using a stub that answers with an empty array.
pub async fn build_test_app() -> Router {
    build_test_app_with(StubProvider::text("[]")).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, cookie: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(cookie), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, cookie: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(cookie), Some(body)).await
}

/// POST a raw body, with an optional `Content-Type`, as an authenticated user.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    cookie: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, cookie);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// The `name=value` pair of the `session` cookie set on a response, if any.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Log in with the demo credentials and return the cookie header value.
pub async fn login(app: &Router) -> String {
    let response = post_json(
        app.clone(),
        "/api/auth/login",
        serde_json::json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), 200);
    session_cookie_pair(&response).expect("login should set the session cookie")
}

/// Ids of the seeded demo organization and its first line.
pub async fn demo_org_and_line(app: &Router, cookie: &str) -> (i64, i64) {
    let orgs = body_json(get_auth(app.clone(), "/api/orgs", cookie).await).await;
    let org_id = orgs["organizations"][0]["id"].as_i64().unwrap();
    let lines = body_json(
        get_auth(app.clone(), &format!("/api/orgs/{org_id}/lines"), cookie).await,
    )
    .await;
    let line_id = lines["lines"][0]["id"].as_i64().unwrap();
    (org_id, line_id)
}

/// Record the 480/12/420/18 shift for the demo org and return its id.
pub async fn create_demo_shift(app: &Router, cookie: &str, org_id: i64) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/ingest/shift",
        cookie,
        serde_json::json!({
            "org_id": org_id,
            "started_at": "2025-03-10T06:00:00Z",
            "planned_time_min": 480,
            "ideal_cycle_sec": 12.0,
            "output_units": 420,
            "scrap_units": 18
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["shift"]["id"].as_i64().unwrap()
}

/// Record a downtime event and return its id.
pub async fn create_downtime(
    app: &Router,
    cookie: &str,
    shift_id: i64,
    line_id: i64,
    minutes: i64,
    category: &str,
) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/ingest/events",
        cookie,
        serde_json::json!({
            "shift_id": shift_id,
            "type": "downtime",
            "line_id": line_id,
            "timestamp": "2025-03-10T07:30:00Z",
            "category": category,
            "duration_min": minutes
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["event"]["id"].as_i64().unwrap()
}
