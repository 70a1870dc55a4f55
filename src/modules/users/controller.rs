use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{
    CreateUserDto, StudentProfileId, StudentWithProfile, TeacherWithProfile, TransferStudentDto,
    User,
};

use super::service::UserService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/users/teachers",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Teacher and profile created", body = TeacherWithProfile),
        (status = 400, description = "Role mismatch or email taken", body = ErrorResponse),
        (status = 403, description = "Principals only", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<TeacherWithProfile>), AppError> {
    let teacher = UserService::create_teacher(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[utoipa::path(
    post,
    path = "/api/users/students",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Student and profile created", body = StudentWithProfile),
        (status = 400, description = "Role mismatch, foreign class or email taken", body = ErrorResponse),
        (status = 403, description = "Principals only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn create_student(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<StudentWithProfile>), AppError> {
    let student = UserService::create_student(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    post,
    path = "/api/users/parents",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Parent created", body = User),
        (status = 400, description = "Role mismatch or email taken", body = ErrorResponse),
        (status = 403, description = "Principals only", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn create_parent(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let parent = UserService::create_parent(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(parent)))
}

#[utoipa::path(
    get,
    path = "/api/users/students/{id}",
    params(("id" = uuid::Uuid, Path, description = "Student profile ID")),
    responses(
        (status = 200, description = "Student with profile", body = StudentWithProfile),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_student(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<StudentProfileId>,
) -> Result<Json<StudentWithProfile>, AppError> {
    let student = UserService::get_student(state.store.as_ref(), &caller, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/users/students/{id}/class",
    params(("id" = uuid::Uuid, Path, description = "Student profile ID")),
    request_body = TransferStudentDto,
    responses(
        (status = 200, description = "Student moved", body = StudentWithProfile),
        (status = 400, description = "Class belongs to another school", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student or class not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn transfer_student(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<StudentProfileId>,
    ValidatedJson(dto): ValidatedJson<TransferStudentDto>,
) -> Result<Json<StudentWithProfile>, AppError> {
    let student = UserService::transfer_student(state.store.as_ref(), &caller, id, dto).await?;
    Ok(Json(student))
}
