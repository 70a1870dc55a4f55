//! Mutation Guard: cross-entity invariants checked after authorization and
//! before anything is written. Violations are `InvalidArgument`.

use crate::error::{AccessError, AccessResult};
use schoolhub_db::Store;
use schoolhub_models::{
    AssignmentKey, AttendanceEntryDto, Class, ClassId, Role, SchoolId, StudentProfile,
    StudentProfileId, Subject, User,
};
use std::collections::HashSet;

pub struct MutationGuard<'a> {
    store: &'a dyn Store,
}

impl<'a> MutationGuard<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Role-specific endpoints only accept payloads for their own role.
    pub fn expect_role(requested: Role, expected: Role) -> AccessResult<()> {
        if requested != expected {
            return Err(AccessError::invalid(format!(
                "This endpoint creates {} users, got {}",
                expected, requested
            )));
        }
        Ok(())
    }

    pub fn student_in_class(student: &StudentProfile, class_id: ClassId) -> AccessResult<()> {
        if student.class_id != class_id {
            return Err(AccessError::invalid(
                "Student is not enrolled in the subject assignment's class",
            ));
        }
        Ok(())
    }

    pub fn class_in_school(class: &Class, school_id: SchoolId) -> AccessResult<()> {
        if class.school_id != school_id {
            return Err(AccessError::invalid("Class does not belong to this school"));
        }
        Ok(())
    }

    pub fn subject_in_school(subject: &Subject, school_id: SchoolId) -> AccessResult<()> {
        if subject.school_id != school_id {
            return Err(AccessError::invalid("Subject does not belong to this school"));
        }
        Ok(())
    }

    pub fn teacher_in_school(teacher: &User, school_id: SchoolId) -> AccessResult<()> {
        if teacher.role != Role::Teacher || teacher.school_id != Some(school_id) {
            return Err(AccessError::invalid("Teacher does not belong to this school"));
        }
        Ok(())
    }

    /// A class teacher must be an enabled TEACHER of the class's school.
    pub fn class_teacher_candidate(candidate: &User, school_id: SchoolId) -> AccessResult<()> {
        if !candidate.enabled {
            return Err(AccessError::invalid("Class teacher account is disabled"));
        }
        Self::teacher_in_school(candidate, school_id)
    }

    /// Every entry names a distinct student currently enrolled in the class.
    pub fn attendance_batch(
        entries: &[AttendanceEntryDto],
        enrolled: &HashSet<StudentProfileId>,
    ) -> AccessResult<()> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            if !enrolled.contains(&entry.student_id) {
                return Err(AccessError::invalid(format!(
                    "Student {} is not enrolled in this class",
                    entry.student_id
                )));
            }
            if !seen.insert(entry.student_id) {
                return Err(AccessError::invalid(format!(
                    "Student {} appears more than once",
                    entry.student_id
                )));
            }
        }
        Ok(())
    }

    /// Task targets: at least one of student/class, both in `school_id`,
    /// and the student enrolled in the class when both are given.
    pub fn task_targets(
        school_id: SchoolId,
        student: Option<(&StudentProfile, &Class)>,
        class: Option<&Class>,
    ) -> AccessResult<()> {
        if student.is_none() && class.is_none() {
            return Err(AccessError::invalid(
                "A task must target a student or a class",
            ));
        }
        if let Some((_, student_class)) = student {
            if student_class.school_id != school_id {
                return Err(AccessError::invalid(
                    "Student does not belong to the assigning teacher's school",
                ));
            }
        }
        if let Some(class) = class {
            Self::class_in_school(class, school_id)?;
        }
        if let (Some((student, _)), Some(class)) = (student, class) {
            if student.class_id != class.id {
                return Err(AccessError::invalid(
                    "Student is not enrolled in the task's class",
                ));
            }
        }
        Ok(())
    }

    pub fn score_in_range(score: f64, max_score: f64) -> AccessResult<()> {
        if !score.is_finite() || !max_score.is_finite() || score < 0.0 || score > max_score {
            return Err(AccessError::invalid(format!(
                "Score must be between 0 and {}",
                max_score
            )));
        }
        Ok(())
    }

    pub async fn email_available(&self, email: &str) -> AccessResult<()> {
        if self.store.email_exists(email).await? {
            return Err(AccessError::invalid("Email is already registered"));
        }
        Ok(())
    }

    pub async fn assignment_unique(&self, key: &AssignmentKey) -> AccessResult<()> {
        if self.store.assignment_exists(key).await? {
            return Err(AccessError::invalid(
                "This teacher is already assigned to the subject for this class and term",
            ));
        }
        Ok(())
    }
}
