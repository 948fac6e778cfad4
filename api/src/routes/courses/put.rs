use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use db::models::course::CourseChanges;

use super::common::EditCourseReq;
use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::CourseResponse;
use crate::state::AppState;

/// PUT /api/courses/{course_id}
pub async fn edit_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<EditCourseReq>,
) -> ApiResult<CourseResponse> {
    let changes = CourseChanges {
        name: body.name,
        code: body.code,
        description: body.description.map(Some),
        schedule: body.schedule.map(Some),
    };

    let course = state
        .courses
        .update_course(&user.identity(), course_id, changes, Utc::now())
        .await?;

    Ok(ok(StatusCode::OK, CourseResponse::for_owner(course), "Course updated"))
}
