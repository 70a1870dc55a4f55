//! Task models.
//!
//! A task is assigned by a teacher to a single student, a whole class, or a
//! student within a class.

use crate::ids::{ClassId, StudentProfileId, TaskId, TeacherProfileId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Task {
    pub id: TaskId,
    pub teacher_id: TeacherProfileId,
    pub student_id: Option<StudentProfileId>,
    pub class_id: Option<ClassId>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// `teacher_id` is taken from the caller for teachers; administrators must
/// name the assigning teacher.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub student_id: Option<StudentProfileId>,
    pub class_id: Option<ClassId>,
    pub teacher_id: Option<TeacherProfileId>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub teacher_id: TeacherProfileId,
    pub student_id: Option<StudentProfileId>,
    pub class_id: Option<ClassId>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateTaskDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub student_id: Option<StudentProfileId>,
    pub class_id: Option<ClassId>,
    pub status: Option<TaskStatus>,
}

impl UpdateTaskDto {
    /// True when the payload touches nothing but `status`.
    pub fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.student_id.is_none()
            && self.class_id.is_none()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = Some(description);
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(student_id) = self.student_id {
            task.student_id = Some(student_id);
        }
        if let Some(class_id) = self.class_id {
            task.class_id = Some(class_id);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_payload() {
        let dto = UpdateTaskDto {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(dto.is_status_only());
    }

    #[test]
    fn test_status_with_other_fields_is_not_status_only() {
        let dto = UpdateTaskDto {
            status: Some(TaskStatus::Completed),
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(!dto.is_status_only());
        assert!(!UpdateTaskDto::default().is_status_only());
    }

    #[test]
    fn test_in_progress_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, r#""IN_PROGRESS""#);
    }
}
