use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{
    AssignClassTeacherDto, Class, ClassId, CreateClassDto, SchoolScopeQuery, StudentWithProfile,
    UpdateClassDto,
};

use super::service::ClassService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 400, description = "Invalid class teacher or duplicate name", body = ErrorResponse),
        (status = 403, description = "Not an administrator of this school", body = ErrorResponse),
        (status = 404, description = "School or teacher not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn create_class(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let class = ClassService::create_class(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    params(SchoolScopeQuery),
    responses(
        (status = 200, description = "Classes of the school", body = Vec<Class>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "School not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn get_classes(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Query(query): Query<SchoolScopeQuery>,
) -> Result<Json<Vec<Class>>, AppError> {
    let classes = ClassService::list_classes(state.store.as_ref(), &caller, query).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = uuid::Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = Class),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn get_class(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<ClassId>,
) -> Result<Json<Class>, AppError> {
    let class = ClassService::get_class(state.store.as_ref(), &caller, id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = uuid::Uuid, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn update_class(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<Class>, AppError> {
    let class = ClassService::update_class(state.store.as_ref(), &caller, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = uuid::Uuid, Path, description = "Class ID")),
    responses(
        (status = 204, description = "Class deleted"),
        (status = 400, description = "Class still has students or records", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn delete_class(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<ClassId>,
) -> Result<StatusCode, AppError> {
    ClassService::delete_class(state.store.as_ref(), &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}/class-teacher",
    params(("id" = uuid::Uuid, Path, description = "Class ID")),
    request_body = AssignClassTeacherDto,
    responses(
        (status = 200, description = "Class teacher set or cleared", body = Class),
        (status = 400, description = "Candidate is not an enabled teacher of this school", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class or teacher not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn assign_class_teacher(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<AssignClassTeacherDto>,
) -> Result<Json<Class>, AppError> {
    let class = ClassService::assign_class_teacher(state.store.as_ref(), &caller, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/students",
    params(("id" = uuid::Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Students enrolled in the class", body = Vec<StudentWithProfile>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
pub async fn get_class_students(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<StudentWithProfile>>, AppError> {
    let students = ClassService::list_students(state.store.as_ref(), &caller, id).await?;
    Ok(Json(students))
}
