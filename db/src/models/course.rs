use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

/// A course owned by a single teacher. Students join through `enrollment_code`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity-provider id of the teacher who created the course.
    pub owner_id: i64,
    pub name: String,
    /// Short catalogue code, e.g. `CS101`. Not unique.
    pub code: String,
    /// Unique across all courses; the only self-service way in.
    #[sea_orm(unique)]
    pub enrollment_code: String,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Owner-editable course fields. `None` leaves a field untouched; for the
/// optional columns `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<Option<String>>,
    pub schedule: Option<Option<String>>,
}

impl Model {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DbConn,
        owner_id: i64,
        name: &str,
        code: &str,
        enrollment_code: &str,
        description: Option<&str>,
        schedule: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            owner_id: Set(owner_id),
            name: Set(name.to_owned()),
            code: Set(code.to_owned()),
            enrollment_code: Set(enrollment_code.to_owned()),
            description: Set(description.map(str::to_owned)),
            schedule: Set(schedule.map(str::to_owned)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Exact match; callers normalize the code first.
    pub async fn find_by_enrollment_code(
        db: &DbConn,
        enrollment_code: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::EnrollmentCode.eq(enrollment_code))
            .one(db)
            .await
    }

    /// Courses created by `owner_id`, newest first.
    pub async fn find_for_owner(db: &DbConn, owner_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Courses `student_id` is enrolled in, ordered by name.
    pub async fn find_for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .inner_join(super::enrollment::Entity)
            .filter(super::enrollment::Column::StudentId.eq(student_id))
            .order_by_asc(Column::Name)
            .distinct()
            .all(db)
            .await
    }

    pub async fn update(
        db: &DbConn,
        id: i64,
        changes: CourseChanges,
        now: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let mut course = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = changes.name {
            course.name = Set(name);
        }
        if let Some(code) = changes.code {
            course.code = Set(code);
        }
        if let Some(description) = changes.description {
            course.description = Set(description);
        }
        if let Some(schedule) = changes.schedule {
            course.schedule = Set(schedule);
        }

        course.update(db).await
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}
