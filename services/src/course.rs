//! Teacher-owned courses and their enrollment codes.

use chrono::{DateTime, Utc};
use db::codes::generate_code;
use db::models::course::{self, CourseChanges, Model as Course};
use db::models::enrollment;
use sea_orm::DatabaseConnection;
use util::config;

use crate::error::{is_unique_violation_on, CourseError};
use crate::identity::Identity;

const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct CreateCourse {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub schedule: Option<String>,
}

#[derive(Clone)]
pub struct CourseService {
    db: DatabaseConnection,
    code_length: usize,
}

fn required(value: &str, field: &str) -> Result<String, CourseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CourseError::Validation(format!("Course {field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Blank optional text is stored as NULL.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl CourseService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            code_length: config::session_code_length(),
        }
    }

    /// Creates a course owned by `owner` with a fresh enrollment code.
    pub async fn create_course(
        &self,
        owner: &Identity,
        params: CreateCourse,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseError> {
        let name = required(&params.name, "name")?;
        let code = required(&params.code, "code")?;
        let description = optional(params.description);
        let schedule = optional(params.schedule);

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let enrollment_code = generate_code(self.code_length);
            match course::Model::create(
                &self.db,
                owner.id,
                &name,
                &code,
                &enrollment_code,
                description.as_deref(),
                schedule.as_deref(),
                now,
            )
            .await
            {
                Ok(created) => {
                    tracing::info!(course_id = created.id, owner_id = owner.id, "course created");
                    return Ok(created);
                }
                Err(e) if is_unique_violation_on(&e, "courses.enrollment_code") => {
                    tracing::warn!(attempt, "enrollment code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CourseError::StorageConflict)
    }

    /// Applies owner edits. The enrollment code never changes.
    pub async fn update_course(
        &self,
        caller: &Identity,
        course_id: i64,
        changes: CourseChanges,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseError> {
        let existing = self.get_owned(caller, course_id).await?;

        let changes = CourseChanges {
            name: changes.name.as_deref().map(|n| required(n, "name")).transpose()?,
            code: changes.code.as_deref().map(|c| required(c, "code")).transpose()?,
            description: changes.description.map(optional),
            schedule: changes.schedule.map(optional),
        };

        let updated = course::Model::update(&self.db, existing.id, changes, now).await?;
        tracing::info!(course_id, owner_id = caller.id, "course updated");
        Ok(updated)
    }

    /// The course, provided `caller` owns it.
    pub async fn get_owned(&self, caller: &Identity, course_id: i64) -> Result<Course, CourseError> {
        let course = course::Model::find_by_id(&self.db, course_id)
            .await?
            .ok_or(CourseError::NotFound)?;
        if !course.is_owned_by(caller.id) {
            return Err(CourseError::NotOwner);
        }
        Ok(course)
    }

    pub async fn courses_for_teacher(&self, owner: &Identity) -> Result<Vec<Course>, CourseError> {
        Ok(course::Model::find_for_owner(&self.db, owner.id).await?)
    }

    pub async fn courses_for_student(&self, student: &Identity) -> Result<Vec<Course>, CourseError> {
        Ok(course::Model::find_for_student(&self.db, student.id).await?)
    }

    pub async fn enrolled_student_count(&self, course_id: i64) -> Result<u64, CourseError> {
        Ok(enrollment::Model::count_for_course(&self.db, course_id).await?)
    }
}
