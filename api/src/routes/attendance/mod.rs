//! `/api/attendance`, student only.
//!
//! - `POST /attendance/check-in` → mark attendance with a session code
//! - `GET  /attendance/me`       → the caller's attendance history

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod get;
pub mod post;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/check-in", post(post::check_in))
        .route("/me", get(get::my_attendance))
}
