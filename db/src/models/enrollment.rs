use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course membership. The composite primary key makes `(course_id, student_id)` unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Plain insert. A repeat pair fails at the primary key, which callers
    /// translate into a domain rejection.
    pub async fn create(
        db: &DbConn,
        course_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            enrolled_at: Set(now),
        };
        active_model.insert(db).await
    }

    pub async fn exists(db: &DbConn, course_id: i64, student_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((course_id, student_id))
            .one(db)
            .await?
            .is_some())
    }

    pub async fn count_for_course(db: &DbConn, course_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .count(db)
            .await
    }
}
