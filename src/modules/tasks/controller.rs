use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{CreateTaskDto, StudentProfileId, Task, TaskId, UpdateTaskDto};

use super::service::TaskService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskDto,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid task targets", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student, class or teacher not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<CreateTaskDto>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = TaskService::create_task(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Tasks assigned by or to the caller", body = Vec<Task>)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_my_tasks(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = TaskService::list_mine(state.store.as_ref(), &caller).await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = uuid::Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task details", body = Task),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, AppError> {
    let task = TaskService::get_task(state.store.as_ref(), &caller, id).await?;
    Ok(Json(task))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = uuid::Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskDto,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid task targets", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<TaskId>,
    ValidatedJson(dto): ValidatedJson<UpdateTaskDto>,
) -> Result<Json<Task>, AppError> {
    let task = TaskService::update_task(state.store.as_ref(), &caller, id, dto).await?;
    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = uuid::Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, AppError> {
    TaskService::delete_task(state.store.as_ref(), &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/tasks",
    params(("id" = uuid::Uuid, Path, description = "Student profile ID")),
    responses(
        (status = 200, description = "Tasks addressed to the student or the student's class", body = Vec<Task>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_student_tasks(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<StudentProfileId>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = TaskService::list_by_student(state.store.as_ref(), &caller, id).await?;
    Ok(Json(tasks))
}
