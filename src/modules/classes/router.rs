use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    assign_class_teacher, create_class, delete_class, get_class, get_class_students, get_classes,
    update_class,
};
use crate::modules::attendance::controller::get_class_attendance;
use crate::modules::subject_assignments::controller::get_class_assignments;
use crate::state::AppState;

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class).get(get_classes))
        .route(
            "/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/{id}/class-teacher", put(assign_class_teacher))
        .route("/{id}/students", get(get_class_students))
        .route("/{id}/subject-assignments", get(get_class_assignments))
        .route("/{id}/attendance", get(get_class_attendance))
}
