use axum::{
    Json,
    extract::{Path, Query, State},
};
use schoolhub_core::AppError;
use schoolhub_models::{
    Attendance, AttendanceId, AttendanceQuery, ClassId, RecordAttendanceDto, StudentProfileId,
};

use super::service::AttendanceService;
use crate::middleware::auth::CurrentCaller;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = RecordAttendanceDto,
    responses(
        (status = 200, description = "Attendance written, one row per entry", body = Vec<Attendance>),
        (status = 400, description = "Student not in class or listed twice", body = ErrorResponse),
        (status = 403, description = "Only the class teacher or an administrator may record", body = ErrorResponse),
        (status = 404, description = "Class or student not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn record_attendance(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(dto): ValidatedJson<RecordAttendanceDto>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let records = AttendanceService::record_attendance(state.store.as_ref(), &caller, dto).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = uuid::Uuid, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance record", body = Attendance),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn get_attendance(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<AttendanceId>,
) -> Result<Json<Attendance>, AppError> {
    let record = AttendanceService::get_attendance(state.store.as_ref(), &caller, id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/attendance",
    params(("id" = uuid::Uuid, Path, description = "Class ID"), AttendanceQuery),
    responses(
        (status = 200, description = "Attendance of the class in the period", body = Vec<Attendance>),
        (status = 400, description = "Missing or inverted date range", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn get_class_attendance(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<ClassId>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let records =
        AttendanceService::list_class_attendance(state.store.as_ref(), &caller, id, query).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/attendance",
    params(("id" = uuid::Uuid, Path, description = "Student profile ID"), AttendanceQuery),
    responses(
        (status = 200, description = "Attendance of the student in the period", body = Vec<Attendance>),
        (status = 400, description = "Missing or inverted date range", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<StudentProfileId>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let records =
        AttendanceService::list_student_attendance(state.store.as_ref(), &caller, id, query)
            .await?;
    Ok(Json(records))
}
