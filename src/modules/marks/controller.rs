use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{
    CreateMarkDto, Mark, MarkId, StudentProfileId, SubjectAssignmentId, UpdateMarkDto,
};

use super::service::MarkService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/marks",
    request_body = CreateMarkDto,
    responses(
        (status = 201, description = "Mark entered", body = Mark),
        (status = 400, description = "Student not in the assignment's class, or score out of range", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student or assignment not found", body = ErrorResponse)
    ),
    tag = "Marks",
    security(("bearer_auth" = []))
)]
pub async fn create_mark(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateMarkDto>,
) -> Result<(StatusCode, Json<Mark>), AppError> {
    let mark = MarkService::create_mark(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(mark)))
}

#[utoipa::path(
    get,
    path = "/api/marks/{id}",
    params(("id" = uuid::Uuid, Path, description = "Mark ID")),
    responses(
        (status = 200, description = "Mark details", body = Mark),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mark not found", body = ErrorResponse)
    ),
    tag = "Marks",
    security(("bearer_auth" = []))
)]
pub async fn get_mark(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<MarkId>,
) -> Result<Json<Mark>, AppError> {
    let mark = MarkService::get_mark(state.store.as_ref(), &caller, id).await?;
    Ok(Json(mark))
}

#[utoipa::path(
    put,
    path = "/api/marks/{id}",
    params(("id" = uuid::Uuid, Path, description = "Mark ID")),
    request_body = UpdateMarkDto,
    responses(
        (status = 200, description = "Mark updated", body = Mark),
        (status = 400, description = "Score out of range", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mark not found", body = ErrorResponse)
    ),
    tag = "Marks",
    security(("bearer_auth" = []))
)]
pub async fn update_mark(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<MarkId>,
    ValidatedJson(dto): ValidatedJson<UpdateMarkDto>,
) -> Result<Json<Mark>, AppError> {
    let mark = MarkService::update_mark(state.store.as_ref(), &caller, id, dto).await?;
    Ok(Json(mark))
}

#[utoipa::path(
    delete,
    path = "/api/marks/{id}",
    params(("id" = uuid::Uuid, Path, description = "Mark ID")),
    responses(
        (status = 204, description = "Mark deleted"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mark not found", body = ErrorResponse)
    ),
    tag = "Marks",
    security(("bearer_auth" = []))
)]
pub async fn delete_mark(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<MarkId>,
) -> Result<StatusCode, AppError> {
    MarkService::delete_mark(state.store.as_ref(), &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/marks",
    params(("id" = uuid::Uuid, Path, description = "Student profile ID")),
    responses(
        (status = 200, description = "Marks of the student", body = Vec<Mark>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Marks",
    security(("bearer_auth" = []))
)]
pub async fn get_student_marks(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<StudentProfileId>,
) -> Result<Json<Vec<Mark>>, AppError> {
    let marks = MarkService::list_by_student(state.store.as_ref(), &caller, id).await?;
    Ok(Json(marks))
}

#[utoipa::path(
    get,
    path = "/api/subject-assignments/{id}/marks",
    params(("id" = uuid::Uuid, Path, description = "Subject assignment ID")),
    responses(
        (status = 200, description = "Marks entered under the assignment", body = Vec<Mark>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Marks",
    security(("bearer_auth" = []))
)]
pub async fn get_assignment_marks(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SubjectAssignmentId>,
) -> Result<Json<Vec<Mark>>, AppError> {
    let marks = MarkService::list_by_assignment(state.store.as_ref(), &caller, id).await?;
    Ok(Json(marks))
}
