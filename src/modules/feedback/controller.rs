use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use schoolhub_models::{Feedback, FeedbackId, StudentProfileId, SubmitFeedbackDto};

use super::service::FeedbackService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = SubmitFeedbackDto,
    responses(
        (status = 201, description = "Feedback submitted", body = Feedback),
        (status = 400, description = "Student not in the assignment's class", body = ErrorResponse),
        (status = 403, description = "Only the assignment's teacher may submit feedback", body = ErrorResponse),
        (status = 404, description = "Student or assignment not found", body = ErrorResponse)
    ),
    tag = "Feedback",
    security(("bearer_auth" = []))
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<SubmitFeedbackDto>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    let feedback = FeedbackService::submit_feedback(state.store.as_ref(), &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

#[utoipa::path(
    get,
    path = "/api/feedback/{id}",
    params(("id" = uuid::Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback details", body = Feedback),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Feedback not found", body = ErrorResponse)
    ),
    tag = "Feedback",
    security(("bearer_auth" = []))
)]
pub async fn get_feedback(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<FeedbackId>,
) -> Result<Json<Feedback>, AppError> {
    let feedback = FeedbackService::get_feedback(state.store.as_ref(), &caller, id).await?;
    Ok(Json(feedback))
}

#[utoipa::path(
    put,
    path = "/api/feedback/{id}/read",
    params(("id" = uuid::Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback marked as read", body = Feedback),
        (status = 403, description = "Only the student's class teacher may acknowledge feedback", body = ErrorResponse),
        (status = 404, description = "Feedback not found", body = ErrorResponse)
    ),
    tag = "Feedback",
    security(("bearer_auth" = []))
)]
pub async fn mark_feedback_read(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<FeedbackId>,
) -> Result<Json<Feedback>, AppError> {
    let feedback = FeedbackService::mark_read(state.store.as_ref(), &caller, id).await?;
    Ok(Json(feedback))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/feedback",
    params(("id" = uuid::Uuid, Path, description = "Student profile ID")),
    responses(
        (status = 200, description = "Feedback on the student visible to the caller", body = Vec<Feedback>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Feedback",
    security(("bearer_auth" = []))
)]
pub async fn get_student_feedback(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<StudentProfileId>,
) -> Result<Json<Vec<Feedback>>, AppError> {
    let feedback = FeedbackService::list_by_student(state.store.as_ref(), &caller, id).await?;
    Ok(Json(feedback))
}
