//! Subject assignment models.
//!
//! A subject assignment is the only record that gives a teacher teaching
//! rights in a class. Being the class teacher is a separate relationship.

use crate::ids::{ClassId, SubjectAssignmentId, SubjectId, TeacherProfileId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "assignment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct SubjectAssignment {
    pub id: SubjectAssignmentId,
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherProfileId,
    pub academic_year: String,
    pub term: String,
    pub status: AssignmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SubjectAssignment {
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }

    pub fn key(&self) -> AssignmentKey {
        AssignmentKey {
            class_id: self.class_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            academic_year: self.academic_year.clone(),
            term: self.term.clone(),
        }
    }
}

/// The natural key of an assignment: at most one row per value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentKey {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherProfileId,
    pub academic_year: String,
    pub term: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSubjectAssignmentDto {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherProfileId,
    #[validate(length(min = 4, max = 20, message = "Academic year must be 4-20 characters"))]
    pub academic_year: String,
    #[validate(length(min = 1, max = 20, message = "Term must be 1-20 characters"))]
    pub term: String,
    pub status: Option<AssignmentStatus>,
}

impl CreateSubjectAssignmentDto {
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey {
            class_id: self.class_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            academic_year: self.academic_year.clone(),
            term: self.term.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateSubjectAssignmentDto {
    pub class_id: Option<ClassId>,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherProfileId>,
    #[validate(length(min = 4, max = 20, message = "Academic year must be 4-20 characters"))]
    pub academic_year: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Term must be 1-20 characters"))]
    pub term: Option<String>,
    pub status: Option<AssignmentStatus>,
}

impl UpdateSubjectAssignmentDto {
    /// Applies the present fields onto `assignment`.
    pub fn apply(self, assignment: &mut SubjectAssignment) {
        if let Some(class_id) = self.class_id {
            assignment.class_id = class_id;
        }
        if let Some(subject_id) = self.subject_id {
            assignment.subject_id = subject_id;
        }
        if let Some(teacher_id) = self.teacher_id {
            assignment.teacher_id = teacher_id;
        }
        if let Some(year) = self.academic_year {
            assignment.academic_year = year;
        }
        if let Some(term) = self.term {
            assignment.term = term;
        }
        if let Some(status) = self.status {
            assignment.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment() -> SubjectAssignment {
        SubjectAssignment {
            id: SubjectAssignmentId::from_u128(1),
            class_id: ClassId::from_u128(2),
            subject_id: SubjectId::from_u128(3),
            teacher_id: TeacherProfileId::from_u128(4),
            academic_year: "2025/2026".to_string(),
            term: "1".to_string(),
            status: AssignmentStatus::Active,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut a = assignment();
        UpdateSubjectAssignmentDto {
            status: Some(AssignmentStatus::Completed),
            ..Default::default()
        }
        .apply(&mut a);
        assert_eq!(a.status, AssignmentStatus::Completed);
        assert_eq!(a.term, "1");
        assert!(!a.is_active());
    }

    #[test]
    fn test_status_wire_format() {
        let s: AssignmentStatus = serde_json::from_str(r#""CANCELLED""#).unwrap();
        assert_eq!(s, AssignmentStatus::Cancelled);
    }
}
