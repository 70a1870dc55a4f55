use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_task, delete_task, get_my_tasks, get_task, update_task};
use crate::state::AppState;

pub fn init_tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_task).get(get_my_tasks))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
}
