use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{get_feedback, mark_feedback_read, submit_feedback};
use crate::state::AppState;

pub fn init_feedback_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_feedback))
        .route("/{id}", get(get_feedback))
        .route("/{id}/read", put(mark_feedback_read))
}
