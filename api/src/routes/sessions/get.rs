use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use services::report::generate_or_fallback;
use services::{AttendanceReport, AttendanceSummary};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::{RecordResponse, ScanLogResponse, SessionResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct ListSessionsQuery {
    #[serde(default)]
    pub active: bool,
}

/// GET /api/sessions
///
/// Newest first. With `?active=true` the list holds at most the one running
/// session.
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListSessionsQuery>,
) -> ApiResult<Vec<SessionResponse>> {
    let identity = user.identity();

    let sessions = if query.active {
        state
            .sessions
            .active_session_for(&identity)
            .await?
            .into_iter()
            .collect()
    } else {
        state.sessions.sessions_for_teacher(&identity).await?
    };

    Ok(ok(
        StatusCode::OK,
        sessions.into_iter().map(SessionResponse::from).collect(),
        "Sessions retrieved",
    ))
}

/// GET /api/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<SessionResponse> {
    let session = state.sessions.get_session(&user.identity(), session_id).await?;
    Ok(ok(StatusCode::OK, SessionResponse::from(session), "Session retrieved"))
}

/// GET /api/sessions/{session_id}/records
pub async fn list_records(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<RecordResponse>> {
    let session = state.sessions.get_session(&user.identity(), session_id).await?;
    let records = state.ledger.list_for_session(session.id).await?;

    Ok(ok(
        StatusCode::OK,
        records.into_iter().map(RecordResponse::from).collect(),
        "Attendance records retrieved",
    ))
}

/// GET /api/sessions/{session_id}/scan-logs
pub async fn list_scan_logs(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ScanLogResponse>> {
    let session = state.sessions.get_session(&user.identity(), session_id).await?;
    let logs = state.ledger.scan_logs_for_session(session.id).await?;

    Ok(ok(
        StatusCode::OK,
        logs.into_iter().map(ScanLogResponse::from).collect(),
        "Scan logs retrieved",
    ))
}

/// GET /api/sessions/{session_id}/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<AttendanceSummary> {
    let session = state.sessions.get_session(&user.identity(), session_id).await?;
    let summary = state.ledger.summary(&session).await?;
    Ok(ok(StatusCode::OK, summary, "Attendance summary retrieved"))
}

/// GET /api/sessions/{session_id}/report
///
/// Always answers 200 once the session is found: generator failures come
/// back as a fixed fallback report.
pub async fn get_report(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<AttendanceReport> {
    let session = state.sessions.get_session(&user.identity(), session_id).await?;
    let records = state.ledger.list_for_session(session.id).await?;
    let enrolled = state.ledger.summary(&session).await?.enrolled;

    let report = generate_or_fallback(state.reports.as_ref(), &session, &records, enrolled).await;
    Ok(ok(StatusCode::OK, report, "Attendance report generated"))
}
