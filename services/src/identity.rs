//! The caller as vouched for by the identity provider.
//!
//! Nothing here is verified; the API layer builds an [`Identity`] from a
//! signed token and services take it at face value.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Teacher,
    Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub display_name: String,
    pub role: Role,
    /// Institutional id-number; only students carry one.
    pub student_number: Option<String>,
}

impl Identity {
    pub fn teacher(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: Role::Teacher,
            student_number: None,
        }
    }

    pub fn student(id: i64, display_name: impl Into<String>, student_number: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: Role::Student,
            student_number: Some(student_number.into()),
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    /// Student number as snapshotted onto attendance records.
    pub fn student_number_or_default(&self) -> &str {
        self.student_number.as_deref().unwrap_or("N/A")
    }
}
