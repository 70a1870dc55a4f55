use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_attendance, record_attendance};
use crate::state::AppState;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(record_attendance))
        .route("/{id}", get(get_attendance))
}
