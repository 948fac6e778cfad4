use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::DeriveActiveEnum;
use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::geo::Coordinates;

/// Audit trail of every check-in attempt, accepted or not. Append-only and
/// independent of `attendance_records`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scan_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `None` when the submitted code resolved to no active session.
    pub session_id: Option<i64>,
    pub student_id: i64,
    pub submitted_code: String,
    pub status: ScanStatus,
    /// Machine-readable rejection reason, e.g. `AlreadyMarked`.
    pub failure_reason: Option<String>,
    pub attempted_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_fingerprint: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "scan_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScanStatus {
    #[sea_orm(string_value = "success")]
    Success,

    #[sea_orm(string_value = "failed")]
    Failed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id",
        on_delete = "SetNull"
    )]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload for [`Model::append`].
#[derive(Debug, Clone)]
pub struct NewScanLog {
    pub session_id: Option<i64>,
    pub student_id: i64,
    pub submitted_code: String,
    pub status: ScanStatus,
    pub failure_reason: Option<String>,
    pub attempted_at: DateTime<Utc>,
    pub position: Option<Coordinates>,
    pub device_fingerprint: Option<String>,
}

impl Model {
    pub async fn append(db: &DbConn, new: NewScanLog) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            session_id: Set(new.session_id),
            student_id: Set(new.student_id),
            submitted_code: Set(new.submitted_code),
            status: Set(new.status),
            failure_reason: Set(new.failure_reason),
            attempted_at: Set(new.attempted_at),
            latitude: Set(new.position.map(|p| p.latitude)),
            longitude: Set(new.position.map(|p| p.longitude)),
            device_fingerprint: Set(new.device_fingerprint),
            ..Default::default()
        };
        active_model.insert(db).await
    }

    /// Attempts against a session in the order they were logged.
    pub async fn find_for_session(db: &DbConn, session_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn find_for_student(db: &DbConn, student_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
