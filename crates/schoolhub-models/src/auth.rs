//! Authentication request and response models.

use crate::ids::{ClassId, SchoolId, StudentProfileId, TeacherProfileId, UserId};
use crate::users::{Role, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Login request with email and password.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "principal@example.com")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Successful login: a bearer token plus the authenticated user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// The resolved identity of the current caller.
///
/// Returned by `/api/auth/me`. Profile ids are present only for the roles
/// that own a profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CallerSummary {
    pub user_id: UserId,
    pub role: Role,
    pub school_id: Option<SchoolId>,
    pub teacher_profile_id: Option<TeacherProfileId>,
    pub student_profile_id: Option<StudentProfileId>,
    pub class_id: Option<ClassId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "teacher@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest {
            email: "teacher".to_string(),
            password: String::new(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
