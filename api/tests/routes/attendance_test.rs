use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{
    create_course, make_test_app, running_session, send, start_session, student, teacher,
};

#[tokio::test]
async fn student_checks_in_once() {
    let app = make_test_app().await;
    let (_, session) = running_session(&app, 1).await;
    let code = session["code"].as_str().unwrap();
    let token = app.token(&student(20));

    let (status, json) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({ "code": code.to_lowercase(), "device_fingerprint": "fp-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["session_id"], session["id"]);
    assert_eq!(json["data"]["student_id"], 20);
    assert!(json["data"]["distance_meters"].is_null());

    let (status, json) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "You have already marked attendance for this session.");

    let (status, json) = send(&app, "GET", "/api/attendance/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_and_ended_codes_are_not_found() {
    let app = make_test_app().await;
    let (teacher_token, session) = running_session(&app, 1).await;
    let token = app.token(&student(20));

    let (status, json) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({ "code": "ZZZZZZ" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Invalid or inactive session code.");

    let id = session["id"].as_i64().unwrap();
    send(&app, "PUT", &format!("/api/sessions/{id}/end"), Some(&teacher_token), None).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({ "code": session["code"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn second_class_within_cooldown_is_rejected() {
    let app = make_test_app().await;
    let (_, first) = running_session(&app, 1).await;
    let (_, second) = running_session(&app, 2).await;
    let token = app.token(&student(20));

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({ "code": first["code"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({ "code": second["code"] })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        json["message"],
        "Please wait 30 minutes before scanning into another class."
    );
}

#[tokio::test]
async fn geofenced_session_checks_reported_location() {
    let app = make_test_app().await;
    let teacher_token = app.token(&teacher(1));
    let course = create_course(&app, &teacher_token, "Surveying").await;
    let session = start_session(
        &app,
        &teacher_token,
        course["id"].as_i64().unwrap(),
        json!({
            "name": "Field trip",
            "latitude": 0.0,
            "longitude": 0.0,
            "max_distance_meters": 100.0
        }),
    )
    .await;
    let code = session["code"].as_str().unwrap();

    let cases = [
        (
            json!({ "status": "ok", "latitude": 0.0, "longitude": 0.002 }),
            StatusCode::FORBIDDEN,
            "You are 222m from the class; the limit is 100m.",
        ),
        (
            json!({ "status": "denied" }),
            StatusCode::FORBIDDEN,
            "Location permission denied. This session requires your location.",
        ),
        (
            json!({ "status": "unavailable" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unable to determine your location. Please try again.",
        ),
    ];
    let token = app.token(&student(30));
    for (location, expected_status, expected_message) in cases {
        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/check-in",
            Some(&token),
            Some(json!({ "code": code, "location": location })),
        )
        .await;
        assert_eq!(status, expected_status, "{json}");
        assert_eq!(json["message"], expected_message);
    }

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, json) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&token),
        Some(json!({
            "code": code,
            "location": { "status": "ok", "latitude": 0.0, "longitude": 0.0005, "accuracy": 12.0 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    let distance = json["data"]["distance_meters"].as_f64().unwrap();
    assert!((distance - 55.6).abs() < 1.0, "got {distance}");
    assert_eq!(json["data"]["latitude"], 0.0);
}

#[tokio::test]
async fn teachers_cannot_check_in() {
    let app = make_test_app().await;
    let (teacher_token, session) = running_session(&app, 1).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&teacher_token),
        Some(json!({ "code": session["code"] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        None,
        Some(json!({ "code": session["code"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
