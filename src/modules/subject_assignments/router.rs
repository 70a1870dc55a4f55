use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_assignment, delete_assignment, get_assignment, update_assignment,
};
use crate::modules::marks::controller::get_assignment_marks;
use crate::state::AppState;

pub fn init_subject_assignments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment))
        .route(
            "/{id}",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/{id}/marks", get(get_assignment_marks))
}
