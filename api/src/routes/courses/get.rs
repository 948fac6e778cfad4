use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::{CourseResponse, SessionResponse};
use crate::state::AppState;

/// GET /api/courses
///
/// Teachers get the courses they own, enrollment codes included. Students get
/// the courses they are enrolled in.
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<CourseResponse>> {
    let identity = user.identity();

    let courses: Vec<CourseResponse> = if identity.is_teacher() {
        state
            .courses
            .courses_for_teacher(&identity)
            .await?
            .into_iter()
            .map(CourseResponse::for_owner)
            .collect()
    } else {
        state
            .courses
            .courses_for_student(&identity)
            .await?
            .into_iter()
            .map(CourseResponse::for_student)
            .collect()
    };

    Ok(ok(StatusCode::OK, courses, "Courses retrieved"))
}

/// GET /api/courses/{course_id}/sessions
pub async fn list_course_sessions(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<SessionResponse>> {
    let sessions = state
        .sessions
        .sessions_for_course(&user.identity(), course_id)
        .await?;

    Ok(ok(
        StatusCode::OK,
        sessions.into_iter().map(SessionResponse::from).collect(),
        "Sessions retrieved",
    ))
}
