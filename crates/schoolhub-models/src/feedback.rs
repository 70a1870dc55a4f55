//! Teacher-to-student feedback.

use crate::ids::{FeedbackId, StudentProfileId, SubjectAssignmentId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Feedback {
    pub id: FeedbackId,
    pub student_id: StudentProfileId,
    /// The assignment the feedback was given under; its teacher is the author.
    pub assignment_id: SubjectAssignmentId,
    pub content: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct SubmitFeedbackDto {
    pub student_id: StudentProfileId,
    pub assignment_id: SubjectAssignmentId,
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}
