//! Attendance domain services: sessions, check-in validation, enrollment,
//! the attendance ledger and session reports.
//!
//! Every service is a cheap-to-clone handle over a `DatabaseConnection`.
//! Callers pass the acting [`identity::Identity`] and the current time
//! explicitly.

pub mod check_in;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod feed;
pub mod geolocation;
pub mod identity;
pub mod ledger;
pub mod report;
pub mod session_registry;

#[cfg(test)]
mod test_support;

pub use check_in::{CheckInPolicy, CheckInRequest, CheckInValidator};
pub use course::{CourseService, CreateCourse};
pub use enrollment::EnrollmentManager;
pub use error::{CheckInError, CheckInRejection, CourseError, EnrollmentError, ReportError, SessionError};
pub use feed::{AttendanceFeed, AttendanceMarked};
pub use geolocation::{GeolocationProvider, LocationError, Position, ReportedLocation};
pub use identity::{Identity, Role};
pub use ledger::{AttendanceLedger, AttendanceSummary};
pub use report::{AttendanceReport, GeminiReportGenerator, ReportGenerator};
pub use session_registry::{CreateSession, SessionRegistry};
