//! Self-service course membership by enrollment code.

use chrono::{DateTime, Utc};
use db::codes::normalize_code;
use db::models::course::{self, Model as Course};
use db::models::enrollment;
use sea_orm::DatabaseConnection;

use crate::error::{is_unique_violation, EnrollmentError};
use crate::identity::Identity;

#[derive(Clone)]
pub struct EnrollmentManager {
    db: DatabaseConnection,
}

impl EnrollmentManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enrolls `student` in the course whose enrollment code is `code`.
    ///
    /// A second enrollment in the same course is rejected with
    /// [`EnrollmentError::AlreadyEnrolled`]; the pair's primary key is what
    /// decides, so concurrent joins cannot both land.
    pub async fn enroll(
        &self,
        student: &Identity,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Course, EnrollmentError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(EnrollmentError::InvalidCode);
        }

        let course = course::Model::find_by_enrollment_code(&self.db, &code)
            .await?
            .ok_or(EnrollmentError::InvalidCode)?;

        match enrollment::Model::create(&self.db, course.id, student.id, now).await {
            Ok(_) => {
                tracing::info!(course_id = course.id, student_id = student.id, "student enrolled");
                Ok(course)
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(course_id = course.id, student_id = student.id, "duplicate enrollment");
                Err(EnrollmentError::AlreadyEnrolled)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn is_enrolled(&self, course_id: i64, student_id: i64) -> Result<bool, EnrollmentError> {
        Ok(enrollment::Model::exists(&self.db, course_id, student_id).await?)
    }
}
