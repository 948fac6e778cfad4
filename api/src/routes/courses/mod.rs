//! `/api/courses`: course management, enrollment and session start-up.
//!
//! - `GET  /courses`                       → the caller's courses (owned or enrolled)
//! - `POST /courses`                       → create a course (teacher)
//! - `PUT  /courses/{course_id}`           → edit a course (owner)
//! - `POST /courses/enroll`                → join a course by enrollment code (student)
//! - `GET  /courses/{course_id}/sessions`  → sessions of a course (owner)
//! - `POST /courses/{course_id}/sessions`  → start a session (owner)

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};

use crate::auth::guards::{allow_student, allow_teacher};
use crate::state::AppState;

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use get::{list_course_sessions, list_courses};
use post::{create_course, create_session, enroll};
use put::edit_course;

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/", post(create_course).route_layer(from_fn(allow_teacher)))
        .route("/enroll", post(enroll).route_layer(from_fn(allow_student)))
        .route("/{course_id}", put(edit_course).route_layer(from_fn(allow_teacher)))
        .route(
            "/{course_id}/sessions",
            get(list_course_sessions).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/{course_id}/sessions",
            post(create_session).route_layer(from_fn(allow_teacher)),
        )
}
