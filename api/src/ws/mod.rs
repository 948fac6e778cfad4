//! WebSocket routes under `/ws`.
//!
//! - `/ws/sessions/{session_id}` → live attendance for a session (owner only)
//!
//! Browsers cannot set headers on a WebSocket handshake, so the token may be
//! passed as `?token=...` instead of a Bearer header.

use axum::{Router, middleware::from_fn, routing::get};

use crate::auth::guards::allow_teacher;
use crate::state::AppState;

pub mod envelope;
pub mod sessions;

pub fn ws_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/sessions/{session_id}", get(sessions::session_feed_handler))
        .route_layer(from_fn(allow_teacher))
        .with_state(app_state)
}
