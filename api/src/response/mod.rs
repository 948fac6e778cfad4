use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Envelope for every JSON body the API returns:
///
/// ```json
/// { "success": true, "data": { ... }, "message": "Session created" }
/// ```
///
/// Errors carry `T::default()` as `data`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

/// Placeholder payload for responses without data.
#[derive(Serialize, Default, Debug, Clone, Copy)]
pub struct Empty {}

/// What handlers return: a status plus the JSON envelope.
pub type ApiReply<T> = (StatusCode, Json<ApiResponse<T>>);

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

pub fn ok<T: Serialize>(status: StatusCode, data: T, message: impl Into<String>) -> ApiReply<T> {
    (status, Json(ApiResponse::success(data, message)))
}

pub fn fail<T: Serialize + Default>(status: StatusCode, message: impl Into<String>) -> ApiReply<T> {
    (status, Json(ApiResponse::error(message)))
}

/// A failed request: status plus a human-readable message, rendered through
/// the usual envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Storage or another collaborator is unreachable; the request may be retried.
    pub fn unavailable(error: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %error, "transient failure");
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable, please retry",
        )
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        fail::<Empty>(self.status, self.message).into_response()
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::unavailable(&e)
    }
}

/// Handler return type.
pub type ApiResult<T> = Result<ApiReply<T>, ApiError>;
