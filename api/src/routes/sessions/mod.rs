//! `/api/sessions`, teacher only. Every route below checks that the caller
//! owns the session.
//!
//! - `GET /sessions`                    → the caller's sessions (`?active=true` for the live one)
//! - `GET /sessions/{session_id}`       → one session
//! - `PUT /sessions/{session_id}/end`   → end it (repeat calls are a no-op)
//! - `GET /sessions/{session_id}/records`   → accepted check-ins in arrival order
//! - `GET /sessions/{session_id}/scan-logs` → every attempt, accepted or not
//! - `GET /sessions/{session_id}/summary`   → turnout against enrollment
//! - `GET /sessions/{session_id}/report`    → generated attendance report

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub mod get;
pub mod put;

use get::{get_report, get_session, get_summary, list_records, list_scan_logs, list_sessions};
use put::end_session;

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions))
        .route("/{session_id}", get(get_session))
        .route("/{session_id}/end", put(end_session))
        .route("/{session_id}/records", get(list_records))
        .route("/{session_id}/scan-logs", get(list_scan_logs))
        .route("/{session_id}/summary", get(get_summary))
        .route("/{session_id}/report", get(get_report))
}
