//! Decides whether a student's scan counts as attendance.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the code must resolve to an active session
//! 2. the student must not already be marked for that session
//! 3. the student's last accepted check-in, in any session, must be older
//!    than the cooldown window
//! 4. for geofenced sessions, the student's position must be within the
//!    session's radius (inclusive)
//!
//! An accepted attempt is committed as an attendance record. Every attempt,
//! accepted or not, leaves one scan-log row behind.

use chrono::{DateTime, Duration, Utc};
use db::codes::normalize_code;
use db::geo::{Coordinates, Geofence};
use db::models::attendance_record::{self, Model as AttendanceRecord, NewAttendanceRecord};
use db::models::scan_log::{self, NewScanLog, ScanStatus};
use db::models::session;
use sea_orm::DatabaseConnection;
use util::config;

use crate::error::{is_unique_violation, CheckInError, CheckInRejection};
use crate::feed::{publish_marked, AttendanceFeed, AttendanceMarked};
use crate::geolocation::{self, GeolocationProvider, LocationError};
use crate::identity::Identity;

/// Tunables for the validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckInPolicy {
    /// Minimum gap between two accepted check-ins by the same student.
    pub cooldown: Duration,
    /// Bound on position acquisition for geofenced sessions.
    pub geolocation_timeout: std::time::Duration,
}

impl Default for CheckInPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::minutes(30),
            geolocation_timeout: std::time::Duration::from_secs(5),
        }
    }
}

impl CheckInPolicy {
    pub fn from_config() -> Self {
        Self {
            cooldown: Duration::minutes(config::checkin_cooldown_minutes().max(0)),
            geolocation_timeout: std::time::Duration::from_millis(config::geolocation_timeout_ms()),
        }
    }
}

/// What the student submitted.
#[derive(Debug, Clone, Default)]
pub struct CheckInRequest {
    pub code: String,
    pub device_fingerprint: Option<String>,
}

/// Whole minutes left in a cooldown, rounded up.
pub fn remaining_cooldown_minutes(cooldown: Duration, elapsed: Duration) -> i64 {
    let elapsed_minutes = elapsed.num_milliseconds() as f64 / 60_000.0;
    let cooldown_minutes = cooldown.num_milliseconds() as f64 / 60_000.0;
    ((cooldown_minutes - elapsed_minutes).ceil() as i64).max(1)
}

/// Facts gathered while evaluating an attempt, kept for the audit row.
#[derive(Debug, Default)]
struct AttemptTrace {
    session_id: Option<i64>,
    position: Option<Coordinates>,
}

#[derive(Clone)]
pub struct CheckInValidator {
    db: DatabaseConnection,
    policy: CheckInPolicy,
    feed: Option<AttendanceFeed>,
}

impl CheckInValidator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            policy: CheckInPolicy::from_config(),
            feed: None,
        }
    }

    pub fn with_policy(mut self, policy: CheckInPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_feed(mut self, feed: AttendanceFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn policy(&self) -> CheckInPolicy {
        self.policy
    }

    /// Runs one check-in attempt for `student` at server time `now`.
    ///
    /// `geolocation` is consulted only when the resolved session is
    /// geofenced.
    pub async fn attempt_check_in(
        &self,
        student: &Identity,
        request: &CheckInRequest,
        geolocation: &dyn GeolocationProvider,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, CheckInError> {
        let mut trace = AttemptTrace::default();
        let outcome = self
            .evaluate(student, request, geolocation, now, &mut trace)
            .await;

        self.audit(student, request, &trace, &outcome, now).await;

        match &outcome {
            Ok(record) => {
                tracing::info!(
                    session_id = record.session_id,
                    student_id = student.id,
                    distance_meters = ?record.distance_meters,
                    "check-in accepted"
                );
                self.publish(record).await;
            }
            Err(CheckInError::Rejected(rejection)) => {
                tracing::warn!(
                    session_id = ?trace.session_id,
                    student_id = student.id,
                    reason = rejection.reason(),
                    "check-in rejected"
                );
            }
            Err(CheckInError::Storage(e)) => {
                tracing::warn!(
                    session_id = ?trace.session_id,
                    student_id = student.id,
                    error = %e,
                    "check-in failed on storage"
                );
            }
        }

        outcome
    }

    async fn evaluate(
        &self,
        student: &Identity,
        request: &CheckInRequest,
        geolocation: &dyn GeolocationProvider,
        now: DateTime<Utc>,
        trace: &mut AttemptTrace,
    ) -> Result<AttendanceRecord, CheckInError> {
        let code = normalize_code(&request.code);
        let session = if code.is_empty() {
            None
        } else {
            session::Model::find_active_by_code(&self.db, &code).await?
        };
        let Some(session) = session else {
            return Err(CheckInRejection::InvalidOrInactiveCode.into());
        };
        trace.session_id = Some(session.id);

        if attendance_record::Model::exists_for(&self.db, session.id, student.id).await? {
            return Err(CheckInRejection::AlreadyMarked.into());
        }

        if let Some(last) = attendance_record::Model::most_recent_for_student(&self.db, student.id).await? {
            let elapsed = now - last.checked_in_at;
            if elapsed < self.policy.cooldown {
                return Err(CheckInRejection::CooldownActive {
                    remaining_minutes: remaining_cooldown_minutes(self.policy.cooldown, elapsed),
                }
                .into());
            }
        }

        let (position, distance_meters) = match session.geofence() {
            Geofence::None => (None, None),
            Geofence::Circle {
                center,
                radius_meters,
            } => {
                let position = geolocation::acquire(geolocation, self.policy.geolocation_timeout)
                    .await
                    .map_err(|e| match e {
                        LocationError::Denied => CheckInRejection::LocationDenied,
                        LocationError::Unavailable => CheckInRejection::LocationUnavailable,
                    })?
                    .coordinates();
                trace.position = Some(position);

                let distance = center.distance_to(&position);
                if distance > radius_meters {
                    return Err(CheckInRejection::TooFar {
                        distance_meters: distance.round() as i64,
                        max_meters: radius_meters.round() as i64,
                    }
                    .into());
                }
                (Some(position), Some(distance))
            }
        };

        let new = NewAttendanceRecord {
            session_id: session.id,
            student_id: student.id,
            student_name: student.display_name.clone(),
            student_number: student.student_number_or_default().to_owned(),
            checked_in_at: now,
            position,
            distance_meters,
            device_fingerprint: request.device_fingerprint.clone(),
        };

        match attendance_record::Model::insert_new(&self.db, new).await {
            Ok(record) => Ok(record),
            // Lost a race with a concurrent attempt for the same pair.
            Err(e) if is_unique_violation(&e) => Err(CheckInRejection::AlreadyMarked.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Appends the scan-log row. A failure here is logged and swallowed so
    /// the caller still sees the original outcome.
    async fn audit(
        &self,
        student: &Identity,
        request: &CheckInRequest,
        trace: &AttemptTrace,
        outcome: &Result<AttendanceRecord, CheckInError>,
        now: DateTime<Utc>,
    ) {
        let (status, failure_reason) = match outcome {
            Ok(_) => (ScanStatus::Success, None),
            Err(e) => (ScanStatus::Failed, Some(e.reason().to_owned())),
        };

        let entry = NewScanLog {
            session_id: trace.session_id,
            student_id: student.id,
            submitted_code: request.code.trim().to_owned(),
            status,
            failure_reason,
            attempted_at: now,
            position: trace.position,
            device_fingerprint: request.device_fingerprint.clone(),
        };

        if let Err(e) = scan_log::Model::append(&self.db, entry).await {
            tracing::warn!(
                student_id = student.id,
                session_id = ?trace.session_id,
                error = %e,
                "failed to write scan log"
            );
        }
    }

    async fn publish(&self, record: &AttendanceRecord) {
        let Some(feed) = &self.feed else {
            return;
        };
        match attendance_record::Model::count_for_session(&self.db, record.session_id).await {
            Ok(count) => {
                let event = AttendanceMarked {
                    session_id: record.session_id,
                    record: record.clone(),
                    count,
                };
                publish_marked(feed, event).await;
            }
            Err(e) => {
                tracing::warn!(session_id = record.session_id, error = %e, "skipping live update");
            }
        }
    }
}
