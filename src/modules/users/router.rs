use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    create_parent, create_student, create_teacher, get_student, transfer_student,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/teachers", post(create_teacher))
        .route("/students", post(create_student))
        .route("/parents", post(create_parent))
        .route("/students/{id}", get(get_student))
        .route("/students/{id}/class", put(transfer_student))
}
