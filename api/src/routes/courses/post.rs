use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use services::{CreateCourse, CreateSession};

use super::common::{CreateCourseReq, CreateSessionReq, EnrollReq};
use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::{CourseResponse, SessionResponse};
use crate::state::AppState;

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateCourseReq>,
) -> ApiResult<CourseResponse> {
    let params = CreateCourse {
        name: body.name,
        code: body.code,
        description: body.description,
        schedule: body.schedule,
    };

    let course = state
        .courses
        .create_course(&user.identity(), params, Utc::now())
        .await?;

    Ok(ok(
        StatusCode::CREATED,
        CourseResponse::for_owner(course),
        "Course created",
    ))
}

/// POST /api/courses/enroll
pub async fn enroll(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<EnrollReq>,
) -> ApiResult<CourseResponse> {
    let course = state
        .enrollment
        .enroll(&user.identity(), &body.enrollment_code, Utc::now())
        .await?;

    let message = format!("Successfully enrolled in {}!", course.name);
    Ok(ok(StatusCode::OK, CourseResponse::for_student(course), message))
}

/// POST /api/courses/{course_id}/sessions
///
/// Starts a session for the course. A teacher may run one active session at
/// a time; a second start answers `409 Conflict`.
pub async fn create_session(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateSessionReq>,
) -> ApiResult<SessionResponse> {
    let geofence = body.geofence()?;
    let params = CreateSession {
        name: body.name,
        topic: body.topic,
        geofence,
        use_dynamic_qr: body.use_dynamic_qr,
    };

    let session = state
        .sessions
        .create_session(&user.identity(), course_id, params, Utc::now())
        .await?;

    Ok(ok(
        StatusCode::CREATED,
        SessionResponse::from(session),
        "Session started",
    ))
}
