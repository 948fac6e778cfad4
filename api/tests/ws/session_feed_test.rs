use axum::http::StatusCode;
use futures_util::SinkExt;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use crate::helpers::ws::next_json;
use crate::helpers::{connect_ws, make_test_app, running_session, send, spawn_server, student, teacher};

#[tokio::test]
async fn owner_sees_snapshot_then_live_check_ins() {
    let app = make_test_app().await;
    let (token, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();

    let addr = spawn_server(app.router.clone()).await;
    let mut client = connect_ws(addr, &format!("sessions/{id}"), &token).await.unwrap();

    let snapshot = next_json(&mut client).await;
    assert_eq!(snapshot["event"], "attendance.snapshot");
    assert_eq!(snapshot["topic"], format!("attendance:session:{id}"));
    assert_eq!(snapshot["payload"]["count"], 0);

    let learner = app.token(&student(42));
    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/check-in",
        Some(&learner),
        Some(json!({ "code": session["code"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let event = next_json(&mut client).await;
    assert_eq!(event["event"], "attendance.marked");
    assert_eq!(event["payload"]["session_id"], id);
    assert_eq!(event["payload"]["count"], 1);
    assert_eq!(event["payload"]["record"]["student_id"], 42);
}

#[tokio::test]
async fn app_ping_gets_a_pong() {
    let app = make_test_app().await;
    let (token, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();

    let addr = spawn_server(app.router.clone()).await;
    let mut client = connect_ws(addr, &format!("sessions/{id}"), &token).await.unwrap();
    next_json(&mut client).await;

    client
        .send(Message::Text(r#"{"type":"ping"}"#.into()))
        .await
        .unwrap();

    let pong = next_json(&mut client).await;
    assert_eq!(pong["event"], "pong");
}

#[tokio::test]
async fn feed_is_refused_to_everyone_but_the_owner() {
    let app = make_test_app().await;
    let (_, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();
    let addr = spawn_server(app.router.clone()).await;

    let stranger = app.token(&teacher(2));
    assert!(connect_ws(addr, &format!("sessions/{id}"), &stranger).await.is_err());

    let learner = app.token(&student(3));
    assert!(connect_ws(addr, &format!("sessions/{id}"), &learner).await.is_err());

    assert!(connect_ws(addr, &format!("sessions/{id}"), "garbage").await.is_err());
}

#[tokio::test]
async fn closing_the_socket_drops_the_topic() {
    let app = make_test_app().await;
    let (token, session) = running_session(&app, 1).await;
    let id = session["id"].as_i64().unwrap();

    let addr = spawn_server(app.router.clone()).await;
    let mut client = connect_ws(addr, &format!("sessions/{id}"), &token).await.unwrap();
    next_json(&mut client).await;
    assert!(app.state.feed().has_topic(&id).await);

    client.close(None).await.unwrap();

    let released = tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while app.state.feed().has_topic(&id).await {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(released.is_ok(), "feed topic outlived its only subscriber");
}
