//! School, class and subject models.

use crate::ids::{ClassId, SchoolId, SubjectId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A school (tenant).
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub address: Option<String>,
    /// The ADMIN user running the school, once appointed.
    pub principal_id: Option<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSchoolDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub address: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateSchoolDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub address: Option<String>,
}

/// A class within a school.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub school_id: SchoolId,
    pub name: String,
    /// User id of the designated class teacher.
    pub class_teacher_id: Option<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Request body for creating a class.
///
/// `school_id` is required for super admins; admins always create classes in
/// their own school and may omit it.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub school_id: Option<SchoolId>,
    pub class_teacher_id: Option<UserId>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
}

/// Appoints (or clears, with `null`) a class teacher.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct AssignClassTeacherDto {
    pub teacher_id: Option<UserId>,
}

/// A subject taught in a school.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub school_id: SchoolId,
    pub name: String,
    pub code: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 20))]
    pub code: Option<String>,
    pub school_id: Option<SchoolId>,
}

/// Query parameter naming the school a listing is for. Super admins must
/// pass it; school-bound callers default to their own school.
#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct SchoolScopeQuery {
    pub school_id: Option<SchoolId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_school_rejects_empty_name() {
        let dto = CreateSchoolDto {
            name: String::new(),
            address: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_class_allows_empty_payload() {
        assert!(UpdateClassDto::default().validate().is_ok());
    }

    #[test]
    fn test_assign_class_teacher_accepts_null() {
        let dto: AssignClassTeacherDto = serde_json::from_str(r#"{"teacher_id": null}"#).unwrap();
        assert!(dto.teacher_id.is_none());
    }
}
