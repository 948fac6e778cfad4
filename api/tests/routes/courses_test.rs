use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{create_course, make_test_app, send, student, teacher};

#[tokio::test]
async fn teacher_creates_and_lists_courses() {
    let app = make_test_app().await;
    let token = app.token(&teacher(1));

    let course = create_course(&app, &token, "Databases").await;
    let code = course["enrollment_code"].as_str().unwrap();
    assert!(code.len() >= 6);
    assert_eq!(code, code.to_uppercase());

    let (status, json) = send(&app, "GET", "/api/courses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = json["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Databases");
    assert_eq!(list[0]["enrollment_code"], code);
}

#[tokio::test]
async fn course_routes_need_a_token_and_the_right_role() {
    let app = make_test_app().await;

    let (status, _) = send(&app, "GET", "/api/courses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/courses", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let student_token = app.token(&student(5));
    let (status, json) = send(
        &app,
        "POST",
        "/api/courses",
        Some(&student_token),
        Some(json!({ "name": "Hacking", "code": "X1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn blank_course_name_is_rejected() {
    let app = make_test_app().await;
    let token = app.token(&teacher(1));

    let (status, json) = send(
        &app,
        "POST",
        "/api/courses",
        Some(&token),
        Some(json!({ "name": "   ", "code": "COS301" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn student_enrolls_once_by_code() {
    let app = make_test_app().await;
    let teacher_token = app.token(&teacher(1));
    let course = create_course(&app, &teacher_token, "Operating Systems").await;
    let code = course["enrollment_code"].as_str().unwrap().to_lowercase();

    let token = app.token(&student(7));
    let (status, json) = send(
        &app,
        "POST",
        "/api/courses/enroll",
        Some(&token),
        Some(json!({ "enrollment_code": format!("  {code} ") })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["message"], "Successfully enrolled in Operating Systems!");
    assert!(json["data"].get("enrollment_code").is_none());

    let (status, json) = send(
        &app,
        "POST",
        "/api/courses/enroll",
        Some(&token),
        Some(json!({ "enrollment_code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "You are already enrolled in this course.");

    let (status, json) = send(&app, "GET", "/api/courses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_enrollment_code_is_not_found() {
    let app = make_test_app().await;
    let token = app.token(&student(7));

    let (status, json) = send(
        &app,
        "POST",
        "/api/courses/enroll",
        Some(&token),
        Some(json!({ "enrollment_code": "NOPE00" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Invalid enrollment code.");
}

#[tokio::test]
async fn only_the_owner_edits_a_course() {
    let app = make_test_app().await;
    let owner = app.token(&teacher(1));
    let course = create_course(&app, &owner, "Compilers").await;
    let id = course["id"].as_i64().unwrap();

    let stranger = app.token(&teacher(2));
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/courses/{id}"),
        Some(&stranger),
        Some(json!({ "name": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/courses/{id}"),
        Some(&owner),
        Some(json!({ "name": "Compilers II", "schedule": "Mon 08:30" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["name"], "Compilers II");
    assert_eq!(json["data"]["schedule"], "Mon 08:30");
    assert_eq!(json["data"]["enrollment_code"], course["enrollment_code"]);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/courses/{id}"),
        Some(&owner),
        Some(json!({ "schedule": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["schedule"].is_null());

    let (status, _) = send(
        &app,
        "PUT",
        "/api/courses/9999",
        Some(&owner),
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
