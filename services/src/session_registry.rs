//! Session creation, lookup and the one-way active → ended transition.

use chrono::{DateTime, Utc};
use db::codes::{generate_code, normalize_code};
use db::geo::Geofence;
use db::models::course;
use db::models::session::{self, Model as Session, NewSession};
use sea_orm::DatabaseConnection;
use util::config;

use crate::error::{is_unique_violation, is_unique_violation_on, SessionError};
use crate::identity::Identity;

/// Fresh codes tried before giving up on a run of collisions.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Teacher-supplied session options.
#[derive(Debug, Clone, Default)]
pub struct CreateSession {
    pub name: String,
    pub topic: String,
    pub geofence: Geofence,
    pub use_dynamic_qr: bool,
}

#[derive(Clone)]
pub struct SessionRegistry {
    db: DatabaseConnection,
    code_length: usize,
    code_source: fn(usize) -> String,
}

impl SessionRegistry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            code_length: config::session_code_length(),
            code_source: generate_code,
        }
    }

    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length.max(config::MIN_CODE_LENGTH);
        self
    }

    #[cfg(test)]
    fn with_code_source(mut self, code_source: fn(usize) -> String) -> Self {
        self.code_source = code_source;
        self
    }

    /// Creates an active session under `course_id` with a fresh check-in code.
    ///
    /// The course must belong to `owner`, and `owner` must not already have
    /// an active session. The latter is also enforced by a partial unique
    /// index, so two racing creates cannot both succeed.
    pub async fn create_session(
        &self,
        owner: &Identity,
        course_id: i64,
        params: CreateSession,
        now: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(SessionError::Validation("Session name is required".into()));
        }
        if !params.geofence.is_valid() {
            return Err(SessionError::Validation(
                "Geofence needs a valid center and a positive radius".into(),
            ));
        }

        match course::Model::find_by_id(&self.db, course_id).await? {
            Some(c) if c.is_owned_by(owner.id) => {}
            _ => {
                return Err(SessionError::Validation(
                    "Course not found or not owned by you".into(),
                ));
            }
        }

        if session::Model::find_active_for_owner(&self.db, owner.id)
            .await?
            .is_some()
        {
            return Err(SessionError::ActiveSessionExists);
        }

        self.insert_with_fresh_code(owner, course_id, name, &params, now)
            .await
    }

    /// Inserts the session, drawing a new code whenever the previous one
    /// was already taken. Any other uniqueness failure is the
    /// one-active-session index firing after a concurrent create.
    async fn insert_with_fresh_code(
        &self,
        owner: &Identity,
        course_id: i64,
        name: &str,
        params: &CreateSession,
        now: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new = NewSession {
                course_id,
                owner_id: owner.id,
                name: name.to_owned(),
                topic: params.topic.trim().to_owned(),
                code: (self.code_source)(self.code_length),
                geofence: params.geofence,
                use_dynamic_qr: params.use_dynamic_qr,
            };

            match session::Model::create(&self.db, new, now).await {
                Ok(created) => {
                    tracing::info!(
                        session_id = created.id,
                        course_id,
                        owner_id = owner.id,
                        geofenced = created.max_distance_meters.is_some(),
                        "session created"
                    );
                    return Ok(created);
                }
                Err(e) if is_unique_violation_on(&e, "sessions.code") => {
                    tracing::warn!(attempt, "session code collision, retrying");
                }
                Err(e) if is_unique_violation(&e) => return Err(SessionError::ActiveSessionExists),
                Err(e) => return Err(e.into()),
            }
        }

        Err(SessionError::StorageConflict)
    }

    /// Ends the session. Ending an already-ended session is a no-op that
    /// returns the session unchanged.
    pub async fn end_session(
        &self,
        caller: &Identity,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        let existing = self.get_session(caller, session_id).await?;
        if !existing.is_active {
            return Ok(existing);
        }

        if session::Model::deactivate(&self.db, session_id, now).await? {
            tracing::info!(session_id, owner_id = caller.id, "session ended");
        }

        session::Model::find_by_id(&self.db, session_id)
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Active session whose code matches `code`, ignoring case and
    /// surrounding whitespace.
    pub async fn find_active_by_code(&self, code: &str) -> Result<Option<Session>, SessionError> {
        let normalized = normalize_code(code);
        if normalized.is_empty() {
            return Ok(None);
        }
        Ok(session::Model::find_active_by_code(&self.db, &normalized).await?)
    }

    /// The session, provided `caller` owns it.
    pub async fn get_session(&self, caller: &Identity, session_id: i64) -> Result<Session, SessionError> {
        let session = session::Model::find_by_id(&self.db, session_id)
            .await?
            .ok_or(SessionError::NotFound)?;
        if !session.is_owned_by(caller.id) {
            return Err(SessionError::NotOwner);
        }
        Ok(session)
    }

    pub async fn sessions_for_teacher(&self, owner: &Identity) -> Result<Vec<Session>, SessionError> {
        Ok(session::Model::find_for_owner(&self.db, owner.id).await?)
    }

    pub async fn active_session_for(&self, owner: &Identity) -> Result<Option<Session>, SessionError> {
        Ok(session::Model::find_active_for_owner(&self.db, owner.id).await?)
    }

    pub async fn sessions_for_course(
        &self,
        caller: &Identity,
        course_id: i64,
    ) -> Result<Vec<Session>, SessionError> {
        let course = course::Model::find_by_id(&self.db, course_id)
            .await?
            .ok_or(SessionError::NotFound)?;
        if !course.is_owned_by(caller.id) {
            return Err(SessionError::NotOwner);
        }
        Ok(session::Model::find_for_course(&self.db, course_id).await?)
    }
}
