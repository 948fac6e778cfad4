use chrono::{DateTime, Utc};
use db::codes::generate_code;
use db::geo::Geofence;
use db::models::{course, session};
use sea_orm::DatabaseConnection;

use crate::identity::Identity;

pub fn teacher(id: i64) -> Identity {
    Identity::teacher(id, format!("Teacher {id}"))
}

pub fn student(id: i64) -> Identity {
    Identity::student(id, format!("Student {id}"), format!("u{id:08}"))
}

pub async fn seed_course(db: &DatabaseConnection, owner: &Identity) -> course::Model {
    course::Model::create(
        db,
        owner.id,
        "Software Engineering",
        "COS301",
        &generate_code(8),
        None,
        None,
        Utc::now(),
    )
    .await
    .unwrap()
}

/// An active session with a known code, bypassing code generation.
pub async fn seed_session(
    db: &DatabaseConnection,
    owner: &Identity,
    code: &str,
    geofence: Geofence,
    now: DateTime<Utc>,
) -> session::Model {
    let course = seed_course(db, owner).await;
    session::Model::create(
        db,
        session::NewSession {
            course_id: course.id,
            owner_id: owner.id,
            name: format!("Session {code}"),
            topic: "Testing".into(),
            code: code.into(),
            geofence,
            use_dynamic_qr: false,
        },
        now,
    )
    .await
    .unwrap()
}
