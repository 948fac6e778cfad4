use std::sync::Arc;

use api::{app, auth::generate_jwt, state::AppState};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use services::{CheckInPolicy, GeminiReportGenerator, Identity};
use tower::ServiceExt;
use util::config::AppConfig;

pub const TEST_JWT_SECRET: &str = "rollcall-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn token(&self, identity: &Identity) -> String {
        generate_jwt(identity).unwrap().0
    }
}

/// App over a fresh in-memory database. Report generation always falls back
/// so no test reaches the network.
pub async fn make_test_app() -> TestApp {
    AppConfig::set_jwt_secret(TEST_JWT_SECRET);

    let db = setup_test_db().await;
    let state = AppState::new(db)
        .with_check_in_policy(CheckInPolicy {
            cooldown: chrono::Duration::minutes(30),
            geolocation_timeout: std::time::Duration::from_millis(500),
        })
        .with_report_generator(Arc::new(GeminiReportGenerator::new("", "test-model")));

    TestApp {
        router: app(state.clone()),
        state,
    }
}

/// Sends one request and returns the status with the decoded JSON body.
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

pub fn teacher(id: i64) -> Identity {
    Identity::teacher(id, format!("Teacher {id}"))
}

pub fn student(id: i64) -> Identity {
    Identity::student(id, format!("Student {id}"), format!("u{id:08}"))
}

/// Creates a course owned by `token`'s teacher and returns its `data`.
pub async fn create_course(app: &TestApp, token: &str, name: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/courses",
        Some(token),
        Some(serde_json::json!({ "name": name, "code": "COS301" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"].clone()
}

/// Starts a session on `course_id` and returns its `data`.
pub async fn start_session(app: &TestApp, token: &str, course_id: i64, body: Value) -> Value {
    let (status, json) = send(
        app,
        "POST",
        &format!("/api/courses/{course_id}/sessions"),
        Some(token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"].clone()
}

/// A teacher with a course and a running session without a geofence.
/// Returns `(teacher token, session data)`.
pub async fn running_session(app: &TestApp, teacher_id: i64) -> (String, Value) {
    let token = app.token(&teacher(teacher_id));
    let course = create_course(app, &token, "Software Engineering").await;
    let session = start_session(
        app,
        &token,
        course["id"].as_i64().unwrap(),
        serde_json::json!({ "name": "Lecture 1", "topic": "Requirements" }),
    )
    .await;
    (token, session)
}
