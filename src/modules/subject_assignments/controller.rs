use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{
    ClassId, CreateSubjectAssignmentDto, SubjectAssignment, SubjectAssignmentId,
    UpdateSubjectAssignmentDto,
};

use super::service::SubjectAssignmentService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/subject-assignments",
    request_body = CreateSubjectAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = SubjectAssignment),
        (status = 400, description = "Foreign subject or teacher, or duplicate assignment", body = ErrorResponse),
        (status = 403, description = "Not an administrator of the class's school", body = ErrorResponse),
        (status = 404, description = "Class, subject or teacher not found", body = ErrorResponse)
    ),
    tag = "Subject Assignments",
    security(("bearer_auth" = []))
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateSubjectAssignmentDto>,
) -> Result<(StatusCode, Json<SubjectAssignment>), AppError> {
    let assignment =
        SubjectAssignmentService::create_assignment(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    get,
    path = "/api/subject-assignments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Subject assignment ID")),
    responses(
        (status = 200, description = "Assignment details", body = SubjectAssignment),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Subject Assignments",
    security(("bearer_auth" = []))
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SubjectAssignmentId>,
) -> Result<Json<SubjectAssignment>, AppError> {
    let assignment =
        SubjectAssignmentService::get_assignment(state.store.as_ref(), &caller, id).await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    put,
    path = "/api/subject-assignments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Subject assignment ID")),
    request_body = UpdateSubjectAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = SubjectAssignment),
        (status = 400, description = "Invalid change", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Assignment or referenced record not found", body = ErrorResponse)
    ),
    tag = "Subject Assignments",
    security(("bearer_auth" = []))
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SubjectAssignmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateSubjectAssignmentDto>,
) -> Result<Json<SubjectAssignment>, AppError> {
    let assignment =
        SubjectAssignmentService::update_assignment(state.store.as_ref(), &caller, id, dto)
            .await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    delete,
    path = "/api/subject-assignments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Subject assignment ID")),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 400, description = "Assignment still has marks or feedback", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Subject Assignments",
    security(("bearer_auth" = []))
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<SubjectAssignmentId>,
) -> Result<StatusCode, AppError> {
    SubjectAssignmentService::delete_assignment(state.store.as_ref(), &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/subject-assignments",
    params(("id" = uuid::Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Assignments of the class", body = Vec<SubjectAssignment>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Subject Assignments",
    security(("bearer_auth" = []))
)]
pub async fn get_class_assignments(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<SubjectAssignment>>, AppError> {
    let assignments =
        SubjectAssignmentService::list_by_class(state.store.as_ref(), &caller, id).await?;
    Ok(Json(assignments))
}
