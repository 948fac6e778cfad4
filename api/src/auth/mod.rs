pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use services::Identity;
use util::config;

/// Mints a token for `identity`, returning it with its RFC 3339 expiry.
///
/// Production tokens come from the identity provider; this exists for local
/// development and tests, which share `JWT_SECRET` with the server.
pub fn generate_jwt(identity: &Identity) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let expiry = Utc::now() + Duration::minutes(config::jwt_duration_minutes() as i64);

    let claims = Claims {
        sub: identity.id,
        name: identity.display_name.clone(),
        role: identity.role,
        student_number: identity.student_number.clone(),
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
