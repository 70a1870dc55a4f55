//! The persistence seam.
//!
//! Services and the access-control core only ever talk to `dyn Store`.
//! [`PgStore`](crate::PgStore) is the production backend; the in-memory
//! store backs tests and demo data.

use async_trait::async_trait;
use chrono::NaiveDate;
use schoolhub_core::AppError;
use schoolhub_models::{
    AssignmentKey, AssignmentStatus, Attendance, AttendanceId, Class, ClassId, Feedback,
    FeedbackId, Mark, MarkId, NewAttendance, NewMark, NewTask, NewUser, School, SchoolId,
    StudentProfile, StudentProfileId, Subject, SubjectAssignment, SubjectAssignmentId, SubjectId,
    Task, TaskId, TeacherProfile, TeacherProfileId, User, UserId,
};
use std::fmt;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A row the write depends on vanished between lookup and write.
    #[error("not found: {0}")]
    NotFound(String),
    /// A unique or referential constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Conflicts are the caller's fault (400); database failures are logged and
/// reported generically (500).
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => AppError::bad_request(anyhow::Error::msg(message)),
            StoreError::NotFound(entity) => {
                AppError::not_found(anyhow::anyhow!("{} not found", entity))
            }
            StoreError::Database(err) => {
                error!(error = %err, "Database error");
                AppError::internal_error("Internal server error")
            }
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Inserts a user that has no profile (super admin, parent).
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    /// Inserts a TEACHER user and its profile atomically.
    async fn insert_teacher(
        &self,
        user: NewUser,
        subjects: Vec<String>,
    ) -> StoreResult<(User, TeacherProfile)>;
    /// Inserts a STUDENT user and its profile atomically.
    async fn insert_student(
        &self,
        user: NewUser,
        class_id: ClassId,
    ) -> StoreResult<(User, StudentProfile)>;

    async fn find_teacher_profile(
        &self,
        id: TeacherProfileId,
    ) -> StoreResult<Option<TeacherProfile>>;
    async fn find_teacher_profile_by_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<TeacherProfile>>;
    async fn find_student_profile(
        &self,
        id: StudentProfileId,
    ) -> StoreResult<Option<StudentProfile>>;
    async fn find_student_profile_by_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<StudentProfile>>;

    async fn list_students_in_class(&self, class_id: ClassId) -> StoreResult<Vec<StudentProfile>>;
    async fn update_student_class(
        &self,
        id: StudentProfileId,
        class_id: ClassId,
    ) -> StoreResult<StudentProfile>;
}

#[async_trait]
pub trait SchoolStore: Send + Sync {
    async fn find_school(&self, id: SchoolId) -> StoreResult<Option<School>>;
    async fn list_schools(&self) -> StoreResult<Vec<School>>;
    async fn insert_school(&self, name: String, address: Option<String>) -> StoreResult<School>;
    async fn update_school(&self, school: &School) -> StoreResult<School>;
    async fn delete_school(&self, id: SchoolId) -> StoreResult<()>;
    /// Creates an ADMIN user and makes it the school's principal atomically.
    async fn appoint_principal(&self, school_id: SchoolId, user: NewUser) -> StoreResult<User>;

    async fn find_class(&self, id: ClassId) -> StoreResult<Option<Class>>;
    async fn list_classes(&self, school_id: SchoolId) -> StoreResult<Vec<Class>>;
    async fn insert_class(
        &self,
        school_id: SchoolId,
        name: String,
        class_teacher_id: Option<UserId>,
    ) -> StoreResult<Class>;
    async fn update_class(&self, class: &Class) -> StoreResult<Class>;
    async fn delete_class(&self, id: ClassId) -> StoreResult<()>;
}

#[async_trait]
pub trait AcademicStore: Send + Sync {
    async fn find_subject(&self, id: SubjectId) -> StoreResult<Option<Subject>>;
    async fn list_subjects(&self, school_id: SchoolId) -> StoreResult<Vec<Subject>>;
    async fn insert_subject(
        &self,
        school_id: SchoolId,
        name: String,
        code: Option<String>,
    ) -> StoreResult<Subject>;

    async fn find_assignment(
        &self,
        id: SubjectAssignmentId,
    ) -> StoreResult<Option<SubjectAssignment>>;
    async fn list_assignments_by_class(
        &self,
        class_id: ClassId,
    ) -> StoreResult<Vec<SubjectAssignment>>;
    async fn insert_assignment(
        &self,
        key: AssignmentKey,
        status: AssignmentStatus,
    ) -> StoreResult<SubjectAssignment>;
    async fn update_assignment(
        &self,
        assignment: &SubjectAssignment,
    ) -> StoreResult<SubjectAssignment>;
    async fn delete_assignment(&self, id: SubjectAssignmentId) -> StoreResult<()>;

    async fn assignment_exists(&self, key: &AssignmentKey) -> StoreResult<bool>;
    /// Teachers holding an ACTIVE assignment in the class.
    async fn active_teacher_ids(&self, class_id: ClassId) -> StoreResult<Vec<TeacherProfileId>>;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_attendance(&self, id: AttendanceId) -> StoreResult<Option<Attendance>>;
    /// Writes a batch keyed by (student, date) in one transaction. Existing
    /// rows are updated in place.
    async fn upsert_attendance(&self, rows: Vec<NewAttendance>) -> StoreResult<Vec<Attendance>>;
    async fn list_class_attendance(
        &self,
        class_id: ClassId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Attendance>>;
    async fn list_student_attendance(
        &self,
        student_id: StudentProfileId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Attendance>>;

    async fn find_mark(&self, id: MarkId) -> StoreResult<Option<Mark>>;
    async fn insert_mark(&self, mark: NewMark) -> StoreResult<Mark>;
    async fn update_mark(&self, mark: &Mark) -> StoreResult<Mark>;
    async fn delete_mark(&self, id: MarkId) -> StoreResult<()>;
    async fn list_marks_by_student(&self, student_id: StudentProfileId) -> StoreResult<Vec<Mark>>;
    async fn list_marks_by_assignment(
        &self,
        assignment_id: SubjectAssignmentId,
    ) -> StoreResult<Vec<Mark>>;

    async fn find_feedback(&self, id: FeedbackId) -> StoreResult<Option<Feedback>>;
    async fn insert_feedback(
        &self,
        student_id: StudentProfileId,
        assignment_id: SubjectAssignmentId,
        content: String,
    ) -> StoreResult<Feedback>;
    async fn mark_feedback_read(&self, id: FeedbackId) -> StoreResult<Feedback>;
    async fn list_feedback_by_student(
        &self,
        student_id: StudentProfileId,
    ) -> StoreResult<Vec<Feedback>>;

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>>;
    async fn insert_task(&self, task: NewTask) -> StoreResult<Task>;
    async fn update_task(&self, task: &Task) -> StoreResult<Task>;
    async fn delete_task(&self, id: TaskId) -> StoreResult<()>;
    async fn list_tasks_by_teacher(&self, teacher_id: TeacherProfileId) -> StoreResult<Vec<Task>>;
    /// Tasks addressed to the student directly, plus class-wide tasks of
    /// `class_id`.
    async fn list_tasks_for_student(
        &self,
        student_id: StudentProfileId,
        class_id: ClassId,
    ) -> StoreResult<Vec<Task>>;
}

/// Everything the application needs from persistence.
#[async_trait]
pub trait Store: UserStore + SchoolStore + AcademicStore + RecordStore + fmt::Debug {
    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_status_mapping() {
        let conflict = AppError::from(StoreError::Conflict("class already exists".into()));
        assert_eq!(conflict.status.as_u16(), 400);
        assert_eq!(conflict.error.to_string(), "class already exists");

        let db = AppError::from(StoreError::Database(sqlx::Error::RowNotFound));
        assert_eq!(db.status.as_u16(), 500);
        assert_eq!(db.error.to_string(), "Internal server error");
    }
}
