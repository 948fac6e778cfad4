use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::response::ApiResponse;

/// `GET /health`, unauthenticated, for uptime probes.
pub fn health_routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new().route("/", get(health_check))
}

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK", "Health check passed"))
}
