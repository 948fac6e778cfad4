//! HTTP routes under `/api`.
//!
//! - `/health`     → liveness probe (public)
//! - `/courses`    → courses, enrollment and session start-up (authenticated; per-route role checks)
//! - `/sessions`   → session management and reporting (teachers)
//! - `/attendance` → check-in and history (students)

use axum::{Router, middleware::from_fn};

use crate::auth::guards::{allow_authenticated, allow_student, allow_teacher};
use crate::state::AppState;

pub mod attendance;
pub mod common;
pub mod courses;
pub mod health;
pub mod sessions;

use attendance::attendance_routes;
use courses::course_routes;
use health::health_routes;
use sessions::session_routes;

pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/courses", course_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/sessions", session_routes().route_layer(from_fn(allow_teacher)))
        .nest("/attendance", attendance_routes().route_layer(from_fn(allow_student)))
        .with_state(app_state)
}
