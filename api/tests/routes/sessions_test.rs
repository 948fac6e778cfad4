use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{
    create_course, make_test_app, running_session, send, start_session, student, teacher,
};

#[tokio::test]
async fn session_lifecycle_allows_one_active_session() {
    let app = make_test_app().await;
    let (token, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();
    let course_id = session["course_id"].as_i64().unwrap();

    let code = session["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(code, code.to_uppercase());
    assert_eq!(session["is_active"], true);
    assert_eq!(session["geofence"]["kind"], "none");

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/courses/{course_id}/sessions"),
        Some(&token),
        Some(json!({ "name": "Lecture 2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["message"].as_str().unwrap().contains("active session"));

    let (status, json) = send(&app, "PUT", &format!("/api/sessions/{id}/end"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["is_active"], false);
    let ended_at = json["data"]["ended_at"].clone();
    assert!(ended_at.is_string());

    let (status, json) = send(&app, "PUT", &format!("/api/sessions/{id}/end"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ended_at"], ended_at);

    start_session(&app, &token, course_id, json!({ "name": "Lecture 2" })).await;
}

#[tokio::test]
async fn geofence_fields_come_together() {
    let app = make_test_app().await;
    let token = app.token(&teacher(1));
    let course = create_course(&app, &token, "Networks").await;
    let course_id = course["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/courses/{course_id}/sessions"),
        Some(&token),
        Some(json!({ "name": "Lab", "latitude": -25.75 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let session = start_session(
        &app,
        &token,
        course_id,
        json!({
            "name": "Lab",
            "latitude": -25.7545,
            "longitude": 28.2314,
            "max_distance_meters": 150.0,
            "use_dynamic_qr": true
        }),
    )
    .await;
    assert_eq!(session["geofence"]["kind"], "circle");
    assert_eq!(session["geofence"]["radius_meters"], 150.0);
    assert_eq!(session["use_dynamic_qr"], true);
}

#[tokio::test]
async fn sessions_are_private_to_their_owner() {
    let app = make_test_app().await;
    let (_, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();
    let course_id = session["course_id"].as_i64().unwrap();

    let other = app.token(&teacher(2));
    let (status, _) = send(&app, "GET", &format!("/api/sessions/{id}"), Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "PUT", &format!("/api/sessions/{id}/end"), Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/courses/{course_id}/sessions"),
        Some(&other),
        Some(json!({ "name": "Hijack" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/api/sessions/9999", Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let learner = app.token(&student(9));
    let (status, _) = send(&app, "GET", "/api/sessions", Some(&learner), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn listings_show_active_and_past_sessions() {
    let app = make_test_app().await;
    let (token, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();
    let course_id = session["course_id"].as_i64().unwrap();

    let (_, json) = send(&app, "GET", "/api/sessions?active=true", Some(&token), None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], id);

    send(&app, "PUT", &format!("/api/sessions/{id}/end"), Some(&token), None).await;

    let (_, json) = send(&app, "GET", "/api/sessions?active=true", Some(&token), None).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let (_, json) = send(&app, "GET", "/api/sessions", Some(&token), None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, json) = send(
        &app,
        "GET",
        &format!("/api/courses/{course_id}/sessions"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["id"], id);
}

#[tokio::test]
async fn summary_scan_logs_and_report() {
    let app = make_test_app().await;
    let (token, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();
    let code = session["code"].as_str().unwrap();

    let (_, courses) = send(&app, "GET", "/api/courses", Some(&token), None).await;
    let enrollment_code = courses["data"][0]["enrollment_code"].as_str().unwrap().to_owned();

    for student_id in [10, 11] {
        let learner = app.token(&student(student_id));
        let (status, _) = send(
            &app,
            "POST",
            "/api/courses/enroll",
            Some(&learner),
            Some(json!({ "enrollment_code": enrollment_code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let learner = app.token(&student(10));
    for _ in 0..2 {
        send(
            &app,
            "POST",
            "/api/attendance/check-in",
            Some(&learner),
            Some(json!({ "code": code })),
        )
        .await;
    }

    let (status, json) = send(&app, "GET", &format!("/api/sessions/{id}/summary"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["attended"], 1);
    assert_eq!(json["data"]["enrolled"], 2);
    assert_eq!(json["data"]["attendance_rate"], 50.0);

    let (_, json) = send(&app, "GET", &format!("/api/sessions/{id}/records"), Some(&token), None).await;
    let records = json["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["student_name"], "Student 10");
    assert_eq!(records[0]["student_number"], "u00000010");

    let (_, json) = send(&app, "GET", &format!("/api/sessions/{id}/scan-logs"), Some(&token), None).await;
    let logs = json["data"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["status"], "success");
    assert_eq!(logs[1]["status"], "failed");
    assert_eq!(logs[1]["failure_reason"], "AlreadyMarked");

    let (status, json) = send(&app, "GET", &format!("/api/sessions/{id}/report"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["summary"], "AI service unavailable (Missing API Key).");
}
