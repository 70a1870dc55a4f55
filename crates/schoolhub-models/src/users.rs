//! User, role and profile models.
//!
//! Every non-super-admin user belongs to exactly one school. Teachers and
//! students additionally own a one-to-one profile row that carries the
//! role-specific data the access rules are written against.

use crate::ids::{ClassId, SchoolId, StudentProfileId, TeacherProfileId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// The five roles a user can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    /// A school principal.
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
            Role::Parent => "PARENT",
        }
    }

    /// Whether users of this role must carry a school id.
    pub fn is_school_scoped(&self) -> bool {
        !matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            "PARENT" => Ok(Role::Parent),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// A user in the system.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub school_id: Option<SchoolId>,
    pub enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Teacher-specific data, one per TEACHER user.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TeacherProfile {
    pub id: TeacherProfileId,
    pub user_id: UserId,
    /// Subject competencies, free-form names.
    pub subjects: Vec<String>,
}

/// Student-specific data, one per STUDENT user.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentProfile {
    pub id: StudentProfileId,
    pub user_id: UserId,
    pub class_id: ClassId,
}

/// Insert payload for a user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub school_id: Option<SchoolId>,
}

/// Request body for every role-specific user creation endpoint.
///
/// `role` must match the endpoint it is sent to; a mismatch is rejected
/// before anything is written.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
    /// Teacher only: subject competencies.
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Student only: the class to enrol into.
    pub class_id: Option<ClassId>,
}

/// Moves a student to another class.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct TransferStudentDto {
    pub class_id: ClassId,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TeacherWithProfile {
    pub user: User,
    pub profile: TeacherProfile,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentWithProfile {
    pub user: User,
    pub profile: StudentProfile,
}
