use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::attendance::init_attendance_router;
use crate::modules::auth::init_auth_router;
use crate::modules::classes::init_classes_router;
use crate::modules::feedback::init_feedback_router;
use crate::modules::marks::init_marks_router;
use crate::modules::schools::init_schools_router;
use crate::modules::students::init_students_router;
use crate::modules::subject_assignments::init_subject_assignments_router;
use crate::modules::subjects::init_subjects_router;
use crate::modules::tasks::init_tasks_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

/// Builds the full application. Authorization happens inside each service,
/// so no route carries a role layer.
pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/schools", init_schools_router())
                .nest("/classes", init_classes_router())
                .nest("/subjects", init_subjects_router())
                .nest("/users", init_users_router())
                .nest("/subject-assignments", init_subject_assignments_router())
                .nest("/attendance", init_attendance_router())
                .nest("/marks", init_marks_router())
                .nest("/feedback", init_feedback_router())
                .nest("/tasks", init_tasks_router())
                .nest("/students", init_students_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
