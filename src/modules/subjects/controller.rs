use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{CreateSubjectDto, SchoolScopeQuery, Subject};

use super::service::SubjectService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Duplicate subject", body = ErrorResponse),
        (status = 403, description = "Not an administrator of this school", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
pub async fn create_subject(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = SubjectService::create_subject(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

#[utoipa::path(
    get,
    path = "/api/subjects",
    params(SchoolScopeQuery),
    responses(
        (status = 200, description = "Subjects of the school", body = Vec<Subject>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
pub async fn get_subjects(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Query(query): Query<SchoolScopeQuery>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = SubjectService::list_subjects(state.store.as_ref(), &caller, query).await?;
    Ok(Json(subjects))
}
