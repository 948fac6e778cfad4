use axum::{Extension, extract::State, http::StatusCode};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::RecordResponse;
use crate::state::AppState;

/// GET /api/attendance/me
///
/// Newest first.
pub async fn my_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<RecordResponse>> {
    let records = state.ledger.history_for_student(user.0.sub).await?;
    Ok(ok(
        StatusCode::OK,
        records.into_iter().map(RecordResponse::from).collect(),
        "Attendance history retrieved",
    ))
}
