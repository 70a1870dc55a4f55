use axum::{Router, routing::post};

use super::controller::{create_subject, get_subjects};
use crate::state::AppState;

pub fn init_subjects_router() -> Router<AppState> {
    Router::new().route("/", post(create_subject).get(get_subjects))
}
