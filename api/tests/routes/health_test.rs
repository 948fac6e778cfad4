use axum::http::StatusCode;

use crate::helpers::{make_test_app, send};

#[tokio::test]
async fn health_check_is_public() {
    let app = make_test_app().await;

    let (status, json) = send(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
}
