//! Maps service errors onto HTTP statuses.
//!
//! Domain rejections become 4xx with the service's message; transient
//! storage failures become 503.

use axum::http::StatusCode;
use services::{CheckInError, CheckInRejection, CourseError, EnrollmentError, SessionError};

use crate::response::ApiError;

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        let status = match &e {
            SessionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SessionError::NotFound => StatusCode::NOT_FOUND,
            SessionError::NotOwner => StatusCode::FORBIDDEN,
            SessionError::ActiveSessionExists | SessionError::StorageConflict => StatusCode::CONFLICT,
            SessionError::Storage(db) => return ApiError::unavailable(db),
        };
        ApiError::new(status, e.to_string())
    }
}

impl From<CheckInRejection> for ApiError {
    fn from(r: CheckInRejection) -> Self {
        let status = match &r {
            CheckInRejection::InvalidOrInactiveCode => StatusCode::NOT_FOUND,
            CheckInRejection::AlreadyMarked => StatusCode::CONFLICT,
            CheckInRejection::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
            CheckInRejection::LocationDenied | CheckInRejection::TooFar { .. } => StatusCode::FORBIDDEN,
            CheckInRejection::LocationUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
        };
        ApiError::new(status, r.to_string())
    }
}

impl From<CheckInError> for ApiError {
    fn from(e: CheckInError) -> Self {
        match e {
            CheckInError::Rejected(r) => r.into(),
            CheckInError::Storage(db) => ApiError::unavailable(&db),
        }
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(e: EnrollmentError) -> Self {
        let status = match &e {
            EnrollmentError::InvalidCode => StatusCode::NOT_FOUND,
            EnrollmentError::AlreadyEnrolled => StatusCode::CONFLICT,
            EnrollmentError::Storage(db) => return ApiError::unavailable(db),
        };
        ApiError::new(status, e.to_string())
    }
}

impl From<CourseError> for ApiError {
    fn from(e: CourseError) -> Self {
        let status = match &e {
            CourseError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CourseError::NotFound => StatusCode::NOT_FOUND,
            CourseError::NotOwner => StatusCode::FORBIDDEN,
            CourseError::StorageConflict => StatusCode::CONFLICT,
            CourseError::Storage(db) => return ApiError::unavailable(db),
        };
        ApiError::new(status, e.to_string())
    }
}
