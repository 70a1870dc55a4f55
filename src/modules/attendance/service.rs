use std::collections::HashSet;

use schoolhub_access::{AccessError, Caller, MutationGuard, Operation, OwnershipResolver};
use schoolhub_core::AppError;
use schoolhub_db::Store;
use schoolhub_models::{
    Attendance, AttendanceId, AttendanceQuery, ClassId, NewAttendance, RecordAttendanceDto,
    StudentProfileId,
};
use tracing::{info, instrument};

use crate::metrics;
use crate::utils::enforce;

pub struct AttendanceService;

impl AttendanceService {
    /// Records a class's attendance for one date.
    ///
    /// Rows are upserted on (student, date): submitting the same day again
    /// overwrites the earlier status instead of adding a row.
    #[instrument(skip(store, caller, dto), fields(class.id = %dto.class_id, date = %dto.date, entries = dto.entries.len()))]
    pub async fn record_attendance(
        store: &dyn Store,
        caller: &Caller,
        dto: RecordAttendanceDto,
    ) -> Result<Vec<Attendance>, AppError> {
        let class = OwnershipResolver::new(store).class(dto.class_id).await?;
        let empty = HashSet::new();
        let enrolled = class
            .chain
            .class
            .as_ref()
            .map_or(&empty, |link| &link.enrolled);

        // Unknown students are a missing record, not a bad batch.
        for entry in dto.entries.iter().filter(|e| !enrolled.contains(&e.student_id)) {
            if store.find_student_profile(entry.student_id).await?.is_none() {
                return Err(AccessError::not_found("Student").into());
            }
        }

        enforce(Operation::RecordAttendance, caller, &class.chain)?;
        MutationGuard::attendance_batch(&dto.entries, enrolled)?;

        let recorded_by = caller.teacher_profile();
        let date = dto.date;
        let rows = dto
            .entries
            .into_iter()
            .map(|entry| NewAttendance {
                student_id: entry.student_id,
                class_id: class.record.id,
                recorded_by,
                attendance_date: date,
                status: entry.status,
                remarks: entry.remarks,
            })
            .collect();

        let records = store.upsert_attendance(rows).await?;
        metrics::track_attendance_written(records.len());
        info!(count = records.len(), "Attendance recorded");
        Ok(records)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_attendance(
        store: &dyn Store,
        caller: &Caller,
        id: AttendanceId,
    ) -> Result<Attendance, AppError> {
        let record = OwnershipResolver::new(store).attendance(id).await?;
        enforce(Operation::ViewAttendanceRecord, caller, &record.chain)?;
        Ok(record.record)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_class_attendance(
        store: &dyn Store,
        caller: &Caller,
        class_id: ClassId,
        query: AttendanceQuery,
    ) -> Result<Vec<Attendance>, AppError> {
        let (from, to) = date_range(&query)?;
        let class = OwnershipResolver::new(store).class(class_id).await?;
        enforce(Operation::ViewClassAttendance, caller, &class.chain)?;
        Ok(store.list_class_attendance(class_id, from, to).await?)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_student_attendance(
        store: &dyn Store,
        caller: &Caller,
        student_id: StudentProfileId,
        query: AttendanceQuery,
    ) -> Result<Vec<Attendance>, AppError> {
        let (from, to) = date_range(&query)?;
        let student = OwnershipResolver::new(store).student(student_id).await?;
        enforce(Operation::ViewStudentAttendance, caller, &student.chain)?;
        Ok(store.list_student_attendance(student_id, from, to).await?)
    }
}

fn date_range(
    query: &AttendanceQuery,
) -> Result<(chrono::NaiveDate, chrono::NaiveDate), AccessError> {
    query.range().ok_or_else(|| {
        AccessError::invalid("Provide either `date` or both `from` and `to` with from <= to")
    })
}
