use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{CreateSchoolDto, CreateUserDto, School, SchoolId, UpdateSchoolDto, User};

use super::service::SchoolService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/schools",
    request_body = CreateSchoolDto,
    responses(
        (status = 201, description = "School created", body = School),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Super admin only", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
pub async fn create_school(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateSchoolDto>,
) -> Result<(StatusCode, Json<School>), AppError> {
    let school = SchoolService::create_school(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(school)))
}

#[utoipa::path(
    get,
    path = "/api/schools",
    responses(
        (status = 200, description = "All schools", body = Vec<School>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Super admin only", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
pub async fn get_all_schools(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<Vec<School>>, AppError> {
    let schools = SchoolService::list_schools(state.store.as_ref(), &caller).await?;
    Ok(Json(schools))
}

#[utoipa::path(
    get,
    path = "/api/schools/{id}",
    params(("id" = uuid::Uuid, Path, description = "School ID")),
    responses(
        (status = 200, description = "School details", body = School),
        (status = 403, description = "Not a member of this school", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
pub async fn get_school(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SchoolId>,
) -> Result<Json<School>, AppError> {
    let school = SchoolService::get_school(state.store.as_ref(), &caller, id).await?;
    Ok(Json(school))
}

#[utoipa::path(
    put,
    path = "/api/schools/{id}",
    params(("id" = uuid::Uuid, Path, description = "School ID")),
    request_body = UpdateSchoolDto,
    responses(
        (status = 200, description = "School updated", body = School),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
pub async fn update_school(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SchoolId>,
    ValidatedJson(dto): ValidatedJson<UpdateSchoolDto>,
) -> Result<Json<School>, AppError> {
    let school = SchoolService::update_school(state.store.as_ref(), &caller, id, dto).await?;
    Ok(Json(school))
}

#[utoipa::path(
    delete,
    path = "/api/schools/{id}",
    params(("id" = uuid::Uuid, Path, description = "School ID")),
    responses(
        (status = 204, description = "School deleted"),
        (status = 400, description = "School still has members", body = ErrorResponse),
        (status = 403, description = "Super admin only", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
pub async fn delete_school(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SchoolId>,
) -> Result<StatusCode, AppError> {
    SchoolService::delete_school(state.store.as_ref(), &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/schools/{id}/principal",
    params(("id" = uuid::Uuid, Path, description = "School ID")),
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Principal created and appointed", body = User),
        (status = 400, description = "Wrong role or email taken", body = ErrorResponse),
        (status = 403, description = "Super admin only", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    tag = "Schools",
    security(("bearer_auth" = []))
)]
pub async fn appoint_principal(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SchoolId>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let principal =
        SchoolService::appoint_principal(state.store.as_ref(), &caller, id, dto).await?;
    Ok((StatusCode::CREATED, Json(principal)))
}
