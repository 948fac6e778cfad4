//! Wire shapes shared by several route groups.

use db::geo::Geofence;
use db::models::attendance_record::Model as AttendanceRecord;
use db::models::course::Model as Course;
use db::models::scan_log::{Model as ScanLog, ScanStatus};
use db::models::session::Model as Session;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    pub code: String,
    /// Shown to the owning teacher only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_code: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CourseResponse {
    pub fn for_owner(c: Course) -> Self {
        let code = c.enrollment_code.clone();
        Self {
            enrollment_code: Some(code),
            ..Self::for_student(c)
        }
    }

    pub fn for_student(c: Course) -> Self {
        Self {
            id: c.id,
            name: c.name,
            code: c.code,
            enrollment_code: None,
            description: c.description,
            schedule: c.schedule,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub topic: String,
    pub code: String,
    pub is_active: bool,
    pub geofence: Geofence,
    pub use_dynamic_qr: bool,
    pub created_at: String,
    pub ended_at: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        Self {
            geofence: s.geofence(),
            id: s.id,
            course_id: s.course_id,
            name: s.name,
            topic: s.topic,
            code: s.code,
            is_active: s.is_active,
            use_dynamic_qr: s.use_dynamic_qr,
            created_at: s.created_at.to_rfc3339(),
            ended_at: s.ended_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub student_number: String,
    pub checked_in_at: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_meters: Option<f64>,
}

impl From<AttendanceRecord> for RecordResponse {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            id: r.id,
            session_id: r.session_id,
            student_id: r.student_id,
            student_name: r.student_name,
            student_number: r.student_number,
            checked_in_at: r.checked_in_at.to_rfc3339(),
            latitude: r.latitude,
            longitude: r.longitude,
            distance_meters: r.distance_meters,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanLogResponse {
    pub id: i64,
    pub session_id: Option<i64>,
    pub student_id: i64,
    pub submitted_code: String,
    pub status: ScanStatus,
    pub failure_reason: Option<String>,
    pub attempted_at: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_fingerprint: Option<String>,
}

impl From<ScanLog> for ScanLogResponse {
    fn from(l: ScanLog) -> Self {
        Self {
            id: l.id,
            session_id: l.session_id,
            student_id: l.student_id,
            submitted_code: l.submitted_code,
            status: l.status,
            failure_reason: l.failure_reason,
            attempted_at: l.attempted_at.to_rfc3339(),
            latitude: l.latitude,
            longitude: l.longitude,
            device_fingerprint: l.device_fingerprint,
        }
    }
}
