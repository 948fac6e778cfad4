use serde::{Deserialize, Serialize};
use services::{Identity, Role};

/// Token payload issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.0.sub,
            display_name: self.0.name.clone(),
            role: self.0.role,
            student_number: self.0.student_number.clone(),
        }
    }
}
