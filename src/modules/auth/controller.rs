use axum::Json;
use axum::extract::State;
use schoolhub_core::AppError;
use schoolhub_models::{CallerSummary, LoginRequest, LoginResponse};
use utoipa::ToSchema;

use super::service::AuthService;
use crate::middleware::auth::CurrentCaller;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login and receive a JWT access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(state.store.as_ref(), dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// The resolved identity of the caller
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current caller", body = CallerSummary),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Account is missing its profile", body = ErrorResponse),
        (status = 404, description = "Account disabled or deleted", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn get_me(CurrentCaller(caller): CurrentCaller) -> Json<CallerSummary> {
    Json(caller.summary())
}
