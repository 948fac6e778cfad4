use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::SessionResponse;
use crate::state::AppState;

/// PUT /api/sessions/{session_id}/end
///
/// Stops accepting check-ins. Ending an already-ended session returns it
/// unchanged.
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<SessionResponse> {
    let session = state
        .sessions
        .end_session(&user.identity(), session_id, Utc::now())
        .await?;

    Ok(ok(StatusCode::OK, SessionResponse::from(session), "Session ended"))
}
