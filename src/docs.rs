use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use schoolhub_models::{
    AssignClassTeacherDto, AssignmentStatus, Attendance, AttendanceEntryDto, AttendanceStatus,
    CallerSummary, Class, CreateClassDto, CreateMarkDto, CreateSchoolDto, CreateSubjectAssignmentDto,
    CreateSubjectDto, CreateTaskDto, CreateUserDto, Feedback, LoginRequest, LoginResponse, Mark,
    RecordAttendanceDto, Role, School, StudentProfile, StudentWithProfile, Subject,
    SubjectAssignment, SubmitFeedbackDto, Task, TaskStatus, TeacherProfile, TeacherWithProfile,
    TransferStudentDto, UpdateClassDto, UpdateMarkDto, UpdateSchoolDto, UpdateSubjectAssignmentDto,
    UpdateTaskDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::schools::controller::create_school,
        crate::modules::schools::controller::get_all_schools,
        crate::modules::schools::controller::get_school,
        crate::modules::schools::controller::update_school,
        crate::modules::schools::controller::delete_school,
        crate::modules::schools::controller::appoint_principal,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::assign_class_teacher,
        crate::modules::classes::controller::get_class_students,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::users::controller::create_teacher,
        crate::modules::users::controller::create_student,
        crate::modules::users::controller::create_parent,
        crate::modules::users::controller::get_student,
        crate::modules::users::controller::transfer_student,
        crate::modules::subject_assignments::controller::create_assignment,
        crate::modules::subject_assignments::controller::get_assignment,
        crate::modules::subject_assignments::controller::update_assignment,
        crate::modules::subject_assignments::controller::delete_assignment,
        crate::modules::subject_assignments::controller::get_class_assignments,
        crate::modules::attendance::controller::record_attendance,
        crate::modules::attendance::controller::get_attendance,
        crate::modules::attendance::controller::get_class_attendance,
        crate::modules::attendance::controller::get_student_attendance,
        crate::modules::marks::controller::create_mark,
        crate::modules::marks::controller::get_mark,
        crate::modules::marks::controller::update_mark,
        crate::modules::marks::controller::delete_mark,
        crate::modules::marks::controller::get_student_marks,
        crate::modules::marks::controller::get_assignment_marks,
        crate::modules::feedback::controller::submit_feedback,
        crate::modules::feedback::controller::get_feedback,
        crate::modules::feedback::controller::mark_feedback_read,
        crate::modules::feedback::controller::get_student_feedback,
        crate::modules::tasks::controller::create_task,
        crate::modules::tasks::controller::get_my_tasks,
        crate::modules::tasks::controller::get_task,
        crate::modules::tasks::controller::update_task,
        crate::modules::tasks::controller::delete_task,
        crate::modules::tasks::controller::get_student_tasks,
    ),
    components(
        schemas(
            ErrorResponse,
            LoginRequest,
            LoginResponse,
            CallerSummary,
            Role,
            User,
            TeacherProfile,
            StudentProfile,
            TeacherWithProfile,
            StudentWithProfile,
            CreateUserDto,
            TransferStudentDto,
            School,
            CreateSchoolDto,
            UpdateSchoolDto,
            Class,
            CreateClassDto,
            UpdateClassDto,
            AssignClassTeacherDto,
            Subject,
            CreateSubjectDto,
            SubjectAssignment,
            AssignmentStatus,
            CreateSubjectAssignmentDto,
            UpdateSubjectAssignmentDto,
            Attendance,
            AttendanceStatus,
            AttendanceEntryDto,
            RecordAttendanceDto,
            Mark,
            CreateMarkDto,
            UpdateMarkDto,
            Feedback,
            SubmitFeedbackDto,
            Task,
            TaskStatus,
            CreateTaskDto,
            UpdateTaskDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and caller identity"),
        (name = "Schools", description = "Schools and their principals"),
        (name = "Classes", description = "Classes, class teachers and enrolment"),
        (name = "Subjects", description = "Subjects offered by a school"),
        (name = "Users", description = "Teacher, student and parent accounts"),
        (name = "Subject Assignments", description = "Teachers assigned to teach a subject to a class"),
        (name = "Attendance", description = "Daily attendance records"),
        (name = "Marks", description = "Assessment marks"),
        (name = "Feedback", description = "Teacher feedback on students"),
        (name = "Tasks", description = "Tasks assigned to students or classes")
    ),
    info(
        title = "SchoolHub API",
        version = "0.1.0",
        description = "Multi-tenant school management REST API with role and ownership based authorization.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
