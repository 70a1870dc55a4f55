use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_mark, delete_mark, get_mark, update_mark};
use crate::state::AppState;

pub fn init_marks_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_mark))
        .route("/{id}", get(get_mark).put(update_mark).delete(delete_mark))
}
