//! Attendance models.

use crate::ids::{AttendanceId, ClassId, StudentProfileId, TeacherProfileId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

/// One attendance row. Unique per (student, date).
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Attendance {
    pub id: AttendanceId,
    pub student_id: StudentProfileId,
    /// The student's class at the time of recording.
    pub class_id: ClassId,
    /// Empty when an administrator recorded it.
    pub recorded_by: Option<TeacherProfileId>,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct AttendanceEntryDto {
    pub student_id: StudentProfileId,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

/// Attendance for a whole class on one date.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RecordAttendanceDto {
    pub class_id: ClassId,
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "At least one entry is required"), nested)]
    pub entries: Vec<AttendanceEntryDto>,
}

/// A row ready to be upserted on (student, date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub student_id: StudentProfileId,
    pub class_id: ClassId,
    pub recorded_by: Option<TeacherProfileId>,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

/// Either a single `date` or a `from`..=`to` range.
#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct AttendanceQuery {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceQuery {
    /// Normalises the query into an inclusive date range.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.date, self.from, self.to) {
            (Some(date), None, None) => Some((date, date)),
            (None, Some(from), Some(to)) if from <= to => Some((from, to)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    #[test]
    fn test_query_range_single_date() {
        let q = AttendanceQuery {
            date: Some(day(3)),
            ..Default::default()
        };
        assert_eq!(q.range(), Some((day(3), day(3))));
    }

    #[test]
    fn test_query_range_rejects_inverted_and_mixed() {
        let inverted = AttendanceQuery {
            date: None,
            from: Some(day(5)),
            to: Some(day(1)),
        };
        assert_eq!(inverted.range(), None);

        let mixed = AttendanceQuery {
            date: Some(day(1)),
            from: Some(day(1)),
            to: Some(day(2)),
        };
        assert_eq!(mixed.range(), None);
        assert_eq!(AttendanceQuery::default().range(), None);
    }

    #[test]
    fn test_record_requires_entries() {
        let dto = RecordAttendanceDto {
            class_id: ClassId::new(),
            date: day(1),
            entries: vec![],
        };
        assert!(dto.validate().is_err());
    }
}
