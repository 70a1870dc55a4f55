use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    appoint_principal, create_school, delete_school, get_all_schools, get_school, update_school,
};
use crate::state::AppState;

pub fn init_schools_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_school).get(get_all_schools))
        .route(
            "/{id}",
            get(get_school).put(update_school).delete(delete_school),
        )
        .route("/{id}/principal", post(appoint_principal))
}
