//! Read side of attendance: who was there, and every attempt made.

use db::models::attendance_record::{self, Model as AttendanceRecord};
use db::models::enrollment;
use db::models::scan_log::{self, Model as ScanLog};
use db::models::session::Model as Session;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

/// Turnout for one session against its course's enrollment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub session_id: i64,
    pub attended: u64,
    pub enrolled: u64,
    /// `attended / enrolled` as a percentage, or `None` with nobody enrolled.
    pub attendance_rate: Option<f64>,
}

#[derive(Clone)]
pub struct AttendanceLedger {
    db: DatabaseConnection,
}

impl AttendanceLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn has_attended(&self, session_id: i64, student_id: i64) -> Result<bool, DbErr> {
        attendance_record::Model::exists_for(&self.db, session_id, student_id).await
    }

    pub async fn most_recent_attendance(&self, student_id: i64) -> Result<Option<AttendanceRecord>, DbErr> {
        attendance_record::Model::most_recent_for_student(&self.db, student_id).await
    }

    /// Records for a session in check-in order.
    pub async fn list_for_session(&self, session_id: i64) -> Result<Vec<AttendanceRecord>, DbErr> {
        attendance_record::Model::find_for_session(&self.db, session_id).await
    }

    /// A student's records across all sessions, newest first.
    pub async fn history_for_student(&self, student_id: i64) -> Result<Vec<AttendanceRecord>, DbErr> {
        attendance_record::Model::find_for_student(&self.db, student_id).await
    }

    pub async fn scan_logs_for_session(&self, session_id: i64) -> Result<Vec<ScanLog>, DbErr> {
        scan_log::Model::find_for_session(&self.db, session_id).await
    }

    pub async fn summary(&self, session: &Session) -> Result<AttendanceSummary, DbErr> {
        let attended = attendance_record::Model::count_for_session(&self.db, session.id).await?;
        let enrolled = enrollment::Model::count_for_course(&self.db, session.course_id).await?;
        let attendance_rate = (enrolled > 0).then(|| attended as f64 * 100.0 / enrolled as f64);

        Ok(AttendanceSummary {
            session_id: session.id,
            attended,
            enrolled,
            attendance_rate,
        })
    }
}
