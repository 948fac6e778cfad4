use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};

use crate::geo::Geofence;

/// A single class meeting collecting attendance.
///
/// Sessions are created active and flip to inactive exactly once; nothing
/// else about a session changes after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub topic: String,
    /// Upper-case check-in code, unique across all sessions.
    #[sea_orm(unique)]
    pub code: String,
    pub is_active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_distance_meters: Option<f64>,
    /// Accepted and stored; codes do not rotate.
    pub use_dynamic_qr: bool,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
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
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload for [`Model::create`].
#[derive(Debug, Clone)]
pub struct NewSession {
    pub course_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub topic: String,
    pub code: String,
    pub geofence: Geofence,
    pub use_dynamic_qr: bool,
}

impl Model {
    pub async fn create(
        db: &DbConn,
        new: NewSession,
        now: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let (latitude, longitude, max_distance_meters) = new.geofence.to_columns();

        let active_model = ActiveModel {
            course_id: Set(new.course_id),
            owner_id: Set(new.owner_id),
            name: Set(new.name),
            topic: Set(new.topic),
            code: Set(new.code),
            is_active: Set(true),
            latitude: Set(latitude),
            longitude: Set(longitude),
            max_distance_meters: Set(max_distance_meters),
            use_dynamic_qr: Set(new.use_dynamic_qr),
            created_at: Set(now),
            ended_at: Set(None),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Active session whose code equals `code`. Callers normalize first.
    pub async fn find_active_by_code(db: &DbConn, code: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Code.eq(code))
            .filter(Column::IsActive.eq(true))
            .one(db)
            .await
    }

    pub async fn find_active_for_owner(
        db: &DbConn,
        owner_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::CreatedAt)
            .one(db)
            .await
    }

    /// Sessions created by `owner_id`, newest first.
    pub async fn find_for_owner(db: &DbConn, owner_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn find_for_course(db: &DbConn, course_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Flips `is_active` to false if, and only if, it is currently true.
    ///
    /// Returns `true` when this call performed the transition. The guard on
    /// `is_active` lives in the `UPDATE` itself, so two racing callers cannot
    /// both observe a transition.
    pub async fn deactivate(db: &DbConn, id: i64, now: DateTime<Utc>) -> Result<bool, DbErr> {
        let res = Entity::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::EndedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(db)
            .await?;
        Ok(res.rows_affected == 1)
    }

    pub fn geofence(&self) -> Geofence {
        Geofence::from_columns(self.latitude, self.longitude, self.max_distance_meters)
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}
