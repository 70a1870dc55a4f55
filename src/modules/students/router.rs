use axum::{Router, routing::get};

use crate::modules::attendance::controller::get_student_attendance;
use crate::modules::feedback::controller::get_student_feedback;
use crate::modules::marks::controller::get_student_marks;
use crate::modules::tasks::controller::get_student_tasks;
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/attendance", get(get_student_attendance))
        .route("/{id}/marks", get(get_student_marks))
        .route("/{id}/feedback", get(get_student_feedback))
        .route("/{id}/tasks", get(get_student_tasks))
}
