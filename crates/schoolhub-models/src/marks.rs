//! Mark (assessment result) models.

use crate::ids::{MarkId, StudentProfileId, SubjectAssignmentId, TeacherProfileId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Mark {
    pub id: MarkId,
    pub student_id: StudentProfileId,
    pub assignment_id: SubjectAssignmentId,
    pub recorded_by: Option<TeacherProfileId>,
    pub assessment_type: String,
    pub score: f64,
    pub max_score: f64,
    pub remarks: Option<String>,
    pub assessed_on: NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateMarkDto {
    pub student_id: StudentProfileId,
    pub assignment_id: SubjectAssignmentId,
    #[validate(length(min = 1, max = 50, message = "Assessment type must be 1-50 characters"))]
    pub assessment_type: String,
    pub score: f64,
    #[validate(range(exclusive_min = 0.0, message = "Max score must be positive"))]
    pub max_score: f64,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
    pub assessed_on: NaiveDate,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateMarkDto {
    #[validate(length(min = 1, max = 50, message = "Assessment type must be 1-50 characters"))]
    pub assessment_type: Option<String>,
    pub score: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Max score must be positive"))]
    pub max_score: Option<f64>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
    pub assessed_on: Option<NaiveDate>,
}

impl UpdateMarkDto {
    pub fn apply(self, mark: &mut Mark) {
        if let Some(kind) = self.assessment_type {
            mark.assessment_type = kind;
        }
        if let Some(score) = self.score {
            mark.score = score;
        }
        if let Some(max) = self.max_score {
            mark.max_score = max;
        }
        if let Some(remarks) = self.remarks {
            mark.remarks = Some(remarks);
        }
        if let Some(date) = self.assessed_on {
            mark.assessed_on = date;
        }
    }
}

/// Insert payload; `recorded_by` is empty for administrator entries.
#[derive(Debug, Clone)]
pub struct NewMark {
    pub student_id: StudentProfileId,
    pub assignment_id: SubjectAssignmentId,
    pub recorded_by: Option<TeacherProfileId>,
    pub assessment_type: String,
    pub score: f64,
    pub max_score: f64,
    pub remarks: Option<String>,
    pub assessed_on: NaiveDate,
}
