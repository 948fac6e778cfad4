use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
};
use chrono::Utc;
use serde::Deserialize;
use services::{CheckInRequest, ReportedLocation};

use crate::auth::AuthUser;
use crate::response::{ApiResult, ok};
use crate::routes::common::RecordResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckInReq {
    pub code: String,
    pub device_fingerprint: Option<String>,
    /// What the device reported when asked for its position. Omitted means
    /// the client could not obtain one.
    pub location: Option<ReportedLocation>,
}

/// POST /api/attendance/check-in
///
/// The check-in time is the server's clock. Rejections map to:
/// - `404` unknown or inactive code
/// - `409` already marked for this session
/// - `429` scanned into another class too recently
/// - `403` location denied, or outside the geofence
/// - `422` location could not be determined
///
/// Every attempt is written to the session's scan log.
pub async fn check_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(body): Json<CheckInReq>,
) -> ApiResult<RecordResponse> {
    let device_fingerprint = body.device_fingerprint.or_else(|| {
        headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    });
    let request = CheckInRequest {
        code: body.code,
        device_fingerprint,
    };
    let location = body.location.unwrap_or(ReportedLocation::Unavailable);

    let record = state
        .check_in
        .attempt_check_in(&user.identity(), &request, &location, Utc::now())
        .await?;

    Ok(ok(
        StatusCode::CREATED,
        RecordResponse::from(record),
        "Attendance marked",
    ))
}
