//! # SchoolHub Models
//!
//! Domain entities, enums and request/response DTOs shared by the
//! persistence layer, the access-control core and the HTTP layer.
//!
//! # Modules
//!
//! - [`ids`]: typed `Uuid` wrappers, one per entity
//! - [`users`]: users, roles and teacher/student profiles
//! - [`schools`]: schools, classes and subjects
//! - [`assignments`]: subject assignments
//! - [`attendance`], [`marks`], [`feedback`], [`tasks`]: per-student records
//! - [`auth`]: login and caller summaries

pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod feedback;
pub mod ids;
pub mod marks;
pub mod schools;
pub mod tasks;
pub mod users;

pub use assignments::{
    AssignmentKey, AssignmentStatus, CreateSubjectAssignmentDto, SubjectAssignment,
    UpdateSubjectAssignmentDto,
};
pub use attendance::{
    Attendance, AttendanceEntryDto, AttendanceQuery, AttendanceStatus, NewAttendance,
    RecordAttendanceDto,
};
pub use auth::{CallerSummary, LoginRequest, LoginResponse};
pub use feedback::{Feedback, SubmitFeedbackDto};
pub use ids::*;
pub use marks::{CreateMarkDto, Mark, NewMark, UpdateMarkDto};
pub use schools::{
    AssignClassTeacherDto, Class, CreateClassDto, CreateSchoolDto, CreateSubjectDto,
    SchoolScopeQuery, School, Subject, UpdateClassDto, UpdateSchoolDto,
};
pub use tasks::{CreateTaskDto, NewTask, Task, TaskStatus, UpdateTaskDto};
pub use users::{
    CreateUserDto, NewUser, Role, StudentProfile, StudentWithProfile, TeacherProfile,
    TeacherWithProfile, TransferStudentDto, User,
};
