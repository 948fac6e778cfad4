use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// An accepted check-in. At most one per `(session_id, student_id)`, enforced
/// by a unique index. Rows are never updated or deleted by the application.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    /// Display name as it was at check-in time.
    pub student_name: String,
    /// Institutional student number as it was at check-in time.
    pub student_number: String,
    pub checked_in_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Distance from the session's geofence center, when one was checked.
    pub distance_meters: Option<f64>,
    pub device_fingerprint: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload for [`Model::insert_new`].
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub session_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub student_number: String,
    pub checked_in_at: DateTime<Utc>,
    pub position: Option<Coordinates>,
    pub distance_meters: Option<f64>,
    pub device_fingerprint: Option<String>,
}

impl Model {
    pub async fn insert_new(db: &DbConn, new: NewAttendanceRecord) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            session_id: Set(new.session_id),
            student_id: Set(new.student_id),
            student_name: Set(new.student_name),
            student_number: Set(new.student_number),
            checked_in_at: Set(new.checked_in_at),
            latitude: Set(new.position.map(|p| p.latitude)),
            longitude: Set(new.position.map(|p| p.longitude)),
            distance_meters: Set(new.distance_meters),
            device_fingerprint: Set(new.device_fingerprint),
            ..Default::default()
        };
        active_model.insert(db).await
    }

    pub async fn exists_for(db: &DbConn, session_id: i64, student_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::StudentId.eq(student_id))
            .one(db)
            .await?
            .is_some())
    }

    /// The student's latest check-in across every session.
    pub async fn most_recent_for_student(
        db: &DbConn,
        student_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CheckedInAt)
            .order_by_desc(Column::Id)
            .limit(1)
            .one(db)
            .await
    }

    /// Check-ins for a session in arrival order.
    pub async fn find_for_session(db: &DbConn, session_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::CheckedInAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// A student's check-ins, newest first.
    pub async fn find_for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CheckedInAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_for_session(db: &DbConn, session_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .count(db)
            .await
    }

    pub fn position(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}
