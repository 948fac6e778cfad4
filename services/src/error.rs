//! Typed failures for every service.
//!
//! Each enum separates domain rejections, which are final answers to the
//! caller, from `Storage`, which wraps an unreachable or failing database and
//! is worth retrying. `is_transient()` tells the two apart.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// True when `err` is a uniqueness violation reported by the storage layer.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True when `err` is a uniqueness violation on `table.column`.
///
/// SQLite names the offending columns in the message
/// (`UNIQUE constraint failed: sessions.code`), which is enough to tell a
/// code collision apart from the one-active-session index.
pub(crate) fn is_unique_violation_on(err: &DbErr, column: &str) -> bool {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => msg.contains(column),
        _ => false,
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    #[error("Session not found")]
    NotFound,

    #[error("Only the session owner can do this")]
    NotOwner,

    #[error("You already have an active session. End it before starting another.")]
    ActiveSessionExists,

    #[error("Could not allocate a unique session code")]
    StorageConflict,

    #[error("storage unavailable: {0}")]
    Storage(#[from] DbErr),
}

impl SessionError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Why a check-in attempt was turned away.
///
/// `Display` is the message shown to the student; [`reason`](Self::reason)
/// is the stable string written to the scan log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckInRejection {
    #[error("Invalid or inactive session code.")]
    InvalidOrInactiveCode,

    #[error("You have already marked attendance for this session.")]
    AlreadyMarked,

    #[error("Please wait {remaining_minutes} minutes before scanning into another class.")]
    CooldownActive { remaining_minutes: i64 },

    #[error("Location permission denied. This session requires your location.")]
    LocationDenied,

    #[error("Unable to determine your location. Please try again.")]
    LocationUnavailable,

    #[error("You are {distance_meters}m from the class; the limit is {max_meters}m.")]
    TooFar {
        distance_meters: i64,
        max_meters: i64,
    },
}

impl CheckInRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidOrInactiveCode => "InvalidOrInactiveCode",
            Self::AlreadyMarked => "AlreadyMarked",
            Self::CooldownActive { .. } => "CooldownActive",
            Self::LocationDenied => "LocationDenied",
            Self::LocationUnavailable => "LocationUnavailable",
            Self::TooFar { .. } => "TooFar",
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckInError {
    #[error(transparent)]
    Rejected(#[from] CheckInRejection),

    #[error("storage unavailable: {0}")]
    Storage(#[from] DbErr),
}

impl CheckInError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    pub fn rejection(&self) -> Option<&CheckInRejection> {
        match self {
            Self::Rejected(r) => Some(r),
            Self::Storage(_) => None,
        }
    }

    /// Reason string recorded in the scan log for this outcome.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Rejected(r) => r.reason(),
            Self::Storage(_) => "StorageUnavailable",
        }
    }
}

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("Invalid enrollment code.")]
    InvalidCode,

    #[error("You are already enrolled in this course.")]
    AlreadyEnrolled,

    #[error("storage unavailable: {0}")]
    Storage(#[from] DbErr),
}

impl EnrollmentError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("{0}")]
    Validation(String),

    #[error("Course not found")]
    NotFound,

    #[error("Only the course owner can do this")]
    NotOwner,

    #[error("Could not allocate a unique enrollment code")]
    StorageConflict,

    #[error("storage unavailable: {0}")]
    Storage(#[from] DbErr),
}

impl CourseError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report generator is not configured")]
    NotConfigured,

    #[error("report request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected report response: {0}")]
    InvalidResponse(String),

    #[error("storage unavailable: {0}")]
    Storage(#[from] DbErr),
}

impl ReportError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Http(_))
    }
}
