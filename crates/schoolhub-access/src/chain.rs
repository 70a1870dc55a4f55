//! Ownership Resolver: the path from a record up to its school.
//!
//! A [`Chain`] is computed once per request and handed to the policy as an
//! immutable value. Resolving never writes, and a missing record is reported
//! as `NotFound` before any permission is considered.

use crate::error::{AccessError, AccessResult};
use schoolhub_db::Store;
use schoolhub_models::{
    AssignmentStatus, Attendance, AttendanceId, Class, ClassId, Feedback, FeedbackId, Mark,
    MarkId, School, SchoolId, StudentProfile, StudentProfileId, SubjectAssignment,
    SubjectAssignmentId, Task, TaskId, TeacherProfile, TeacherProfileId, User, UserId,
};
use std::collections::HashSet;

/// The class a record hangs off, with everything the class-level clauses
/// need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLink {
    pub class_id: ClassId,
    /// User id of the designated class teacher.
    pub class_teacher: Option<UserId>,
    pub enrolled: HashSet<StudentProfileId>,
    /// Teachers holding an ACTIVE subject assignment in the class.
    pub active_teachers: HashSet<TeacherProfileId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentLink {
    pub assignment_id: SubjectAssignmentId,
    pub teacher_id: TeacherProfileId,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    pub school_id: Option<SchoolId>,
    pub class: Option<ClassLink>,
    pub assignment: Option<AssignmentLink>,
    /// The student the record belongs to.
    pub student: Option<StudentProfileId>,
    /// The teacher who wrote the record.
    pub recorded_by: Option<TeacherProfileId>,
    /// The teacher who assigned a task.
    pub assigner: Option<TeacherProfileId>,
    /// A task addressed to a whole class rather than one student.
    pub class_wide: bool,
}

impl Chain {
    /// A chain that ends at a school, for records with no class.
    pub fn school(school_id: SchoolId) -> Self {
        Self {
            school_id: Some(school_id),
            ..Default::default()
        }
    }

    /// The empty chain, for operations that are not scoped to any school.
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn with_student(mut self, student: StudentProfileId) -> Self {
        self.student = Some(student);
        self
    }

    pub fn with_assignment(mut self, assignment: &SubjectAssignment) -> Self {
        self.assignment = Some(AssignmentLink {
            assignment_id: assignment.id,
            teacher_id: assignment.teacher_id,
            status: assignment.status,
        });
        self
    }

    pub fn with_recorder(mut self, teacher: Option<TeacherProfileId>) -> Self {
        self.recorded_by = teacher;
        self
    }

    pub fn class_id(&self) -> Option<ClassId> {
        self.class.as_ref().map(|c| c.class_id)
    }
}

/// A resolved record together with its chain.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub record: T,
    pub chain: Chain,
}

pub struct OwnershipResolver<'a> {
    store: &'a dyn Store,
}

impl<'a> OwnershipResolver<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn school(&self, id: SchoolId) -> AccessResult<Resolved<School>> {
        let school = self
            .store
            .find_school(id)
            .await?
            .ok_or_else(|| AccessError::not_found("School"))?;
        Ok(Resolved {
            chain: Chain::school(school.id),
            record: school,
        })
    }

    pub async fn class(&self, id: ClassId) -> AccessResult<Resolved<Class>> {
        let class = self
            .store
            .find_class(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Class"))?;
        let chain = self.class_chain(&class).await?;
        Ok(Resolved {
            record: class,
            chain,
        })
    }

    pub async fn assignment(
        &self,
        id: SubjectAssignmentId,
    ) -> AccessResult<Resolved<SubjectAssignment>> {
        let assignment = self
            .store
            .find_assignment(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Subject assignment"))?;
        let chain = self.assignment_chain(&assignment).await?;
        Ok(Resolved {
            record: assignment,
            chain,
        })
    }

    /// A student profile, chained through the class it is enrolled in.
    pub async fn student(&self, id: StudentProfileId) -> AccessResult<Resolved<StudentProfile>> {
        let student = self.load_student(id).await?;
        let class = self.load_class(student.class_id).await?;
        let chain = self.class_chain(&class).await?.with_student(student.id);
        Ok(Resolved {
            record: student,
            chain,
        })
    }

    /// A teacher profile with its user, chained to the teacher's school.
    pub async fn teacher(
        &self,
        id: TeacherProfileId,
    ) -> AccessResult<Resolved<(TeacherProfile, User)>> {
        let profile = self
            .store
            .find_teacher_profile(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Teacher"))?;
        let user = self
            .store
            .find_user(profile.user_id)
            .await?
            .ok_or_else(|| AccessError::not_found("Teacher"))?;
        Ok(Resolved {
            chain: Chain {
                school_id: user.school_id,
                ..Default::default()
            },
            record: (profile, user),
        })
    }

    /// An attendance row, chained through the class it was recorded in.
    pub async fn attendance(&self, id: AttendanceId) -> AccessResult<Resolved<Attendance>> {
        let record = self
            .store
            .find_attendance(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Attendance record"))?;
        let class = self.load_class(record.class_id).await?;
        let chain = self
            .class_chain(&class)
            .await?
            .with_student(record.student_id)
            .with_recorder(record.recorded_by);
        Ok(Resolved { record, chain })
    }

    /// A mark, chained through its student's current class and the subject
    /// assignment it was given under.
    pub async fn mark(&self, id: MarkId) -> AccessResult<Resolved<Mark>> {
        let mark = self
            .store
            .find_mark(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Mark"))?;
        let student = self.load_student(mark.student_id).await?;
        let assignment = self.load_assignment(mark.assignment_id).await?;
        let chain = self
            .student_record_chain(&student, &assignment)
            .await?
            .with_recorder(mark.recorded_by);
        Ok(Resolved {
            record: mark,
            chain,
        })
    }

    /// Feedback, chained like a mark.
    pub async fn feedback(&self, id: FeedbackId) -> AccessResult<Resolved<Feedback>> {
        let feedback = self
            .store
            .find_feedback(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Feedback"))?;
        let chain = self.feedback_chain(&feedback).await?;
        Ok(Resolved {
            record: feedback,
            chain,
        })
    }

    /// The chain of an already loaded feedback row.
    pub async fn feedback_chain(&self, feedback: &Feedback) -> AccessResult<Chain> {
        let student = self.load_student(feedback.student_id).await?;
        let assignment = self.load_assignment(feedback.assignment_id).await?;
        self.student_record_chain(&student, &assignment).await
    }

    /// A task, chained through its class, or its student's class when it
    /// names no class.
    pub async fn task(&self, id: TaskId) -> AccessResult<Resolved<Task>> {
        let task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Task"))?;
        let chain = self.task_chain(&task).await?;
        Ok(Resolved {
            record: task,
            chain,
        })
    }

    pub async fn task_chain(&self, task: &Task) -> AccessResult<Chain> {
        let class_id = match (task.class_id, task.student_id) {
            (Some(class_id), _) => class_id,
            (None, Some(student_id)) => self.load_student(student_id).await?.class_id,
            (None, None) => return Err(AccessError::not_found("Task target")),
        };
        let class = self.load_class(class_id).await?;
        let mut chain = self.class_chain(&class).await?;
        chain.student = task.student_id;
        chain.assigner = Some(task.teacher_id);
        chain.class_wide = task.student_id.is_none();
        Ok(chain)
    }

    /// The intended chain of a record about to be written for `student`
    /// under `assignment` (marks and feedback).
    pub async fn student_under_assignment(
        &self,
        student_id: StudentProfileId,
        assignment_id: SubjectAssignmentId,
    ) -> AccessResult<Resolved<(StudentProfile, SubjectAssignment)>> {
        let student = self.load_student(student_id).await?;
        let assignment = self.load_assignment(assignment_id).await?;
        let chain = self.student_record_chain(&student, &assignment).await?;
        Ok(Resolved {
            record: (student, assignment),
            chain,
        })
    }

    async fn load_student(&self, id: StudentProfileId) -> AccessResult<StudentProfile> {
        self.store
            .find_student_profile(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Student"))
    }

    async fn load_class(&self, id: ClassId) -> AccessResult<Class> {
        self.store
            .find_class(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Class"))
    }

    async fn load_assignment(&self, id: SubjectAssignmentId) -> AccessResult<SubjectAssignment> {
        self.store
            .find_assignment(id)
            .await?
            .ok_or_else(|| AccessError::not_found("Subject assignment"))
    }

    async fn class_chain(&self, class: &Class) -> AccessResult<Chain> {
        let enrolled = self
            .store
            .list_students_in_class(class.id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let active_teachers = self
            .store
            .active_teacher_ids(class.id)
            .await?
            .into_iter()
            .collect();
        Ok(Chain {
            school_id: Some(class.school_id),
            class: Some(ClassLink {
                class_id: class.id,
                class_teacher: class.class_teacher_id,
                enrolled,
                active_teachers,
            }),
            ..Default::default()
        })
    }

    async fn assignment_chain(&self, assignment: &SubjectAssignment) -> AccessResult<Chain> {
        let class = self.load_class(assignment.class_id).await?;
        Ok(self.class_chain(&class).await?.with_assignment(assignment))
    }

    /// Marks and feedback follow the student: the class clauses use the class
    /// the student is enrolled in now, the assignment clause uses the
    /// assignment the record was given under.
    async fn student_record_chain(
        &self,
        student: &StudentProfile,
        assignment: &SubjectAssignment,
    ) -> AccessResult<Chain> {
        let class = self.load_class(student.class_id).await?;
        Ok(self
            .class_chain(&class)
            .await?
            .with_assignment(assignment)
            .with_student(student.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_db::{AcademicStore, MemoryStore, RecordStore, SchoolStore, UserStore};
    use schoolhub_models::{AssignmentKey, NewMark, NewTask, NewUser, Role};

    fn new_user(email: &str, role: Role, school_id: SchoolId) -> NewUser {
        NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
            school_id: Some(school_id),
        }
    }

    struct Fixture {
        store: MemoryStore,
        class: Class,
        class_teacher: User,
        subject_teacher: TeacherProfile,
        student: StudentProfile,
        assignment: SubjectAssignment,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let school = store.insert_school("North".into(), None).await.unwrap();
        let (class_teacher, _) = store
            .insert_teacher(new_user("ct@x.test", Role::Teacher, school.id), vec![])
            .await
            .unwrap();
        let class = store
            .insert_class(school.id, "1A".into(), Some(class_teacher.id))
            .await
            .unwrap();
        let (_, subject_teacher) = store
            .insert_teacher(new_user("st@x.test", Role::Teacher, school.id), vec![])
            .await
            .unwrap();
        let (_, student) = store
            .insert_student(new_user("s@x.test", Role::Student, school.id), class.id)
            .await
            .unwrap();
        let subject = store
            .insert_subject(school.id, "Maths".into(), None)
            .await
            .unwrap();
        let assignment = store
            .insert_assignment(
                AssignmentKey {
                    class_id: class.id,
                    subject_id: subject.id,
                    teacher_id: subject_teacher.id,
                    academic_year: "2025/2026".into(),
                    term: "1".into(),
                },
                AssignmentStatus::Active,
            )
            .await
            .unwrap();
        Fixture {
            store,
            class,
            class_teacher,
            subject_teacher,
            student,
            assignment,
        }
    }

    #[tokio::test]
    async fn test_class_chain_collects_members() {
        let f = fixture().await;
        let resolved = OwnershipResolver::new(&f.store)
            .class(f.class.id)
            .await
            .unwrap();
        let link = resolved.chain.class.unwrap();
        assert_eq!(resolved.chain.school_id, Some(f.class.school_id));
        assert_eq!(link.class_teacher, Some(f.class_teacher.id));
        assert!(link.enrolled.contains(&f.student.id));
        assert!(link.active_teachers.contains(&f.subject_teacher.id));
    }

    #[tokio::test]
    async fn test_inactive_assignment_is_not_an_active_teacher() {
        let f = fixture().await;
        let mut assignment = f.assignment.clone();
        assignment.status = AssignmentStatus::Completed;
        f.store.update_assignment(&assignment).await.unwrap();

        let chain = OwnershipResolver::new(&f.store)
            .class(f.class.id)
            .await
            .unwrap()
            .chain;
        assert!(chain.class.unwrap().active_teachers.is_empty());
    }

    #[tokio::test]
    async fn test_mark_chain_includes_assignment_and_recorder() {
        let f = fixture().await;
        let mark = f
            .store
            .insert_mark(NewMark {
                student_id: f.student.id,
                assignment_id: f.assignment.id,
                recorded_by: Some(f.subject_teacher.id),
                assessment_type: "Quiz".into(),
                score: 7.0,
                max_score: 10.0,
                remarks: None,
                assessed_on: chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            })
            .await
            .unwrap();

        let chain = OwnershipResolver::new(&f.store)
            .mark(mark.id)
            .await
            .unwrap()
            .chain;
        assert_eq!(chain.student, Some(f.student.id));
        assert_eq!(chain.recorded_by, Some(f.subject_teacher.id));
        let link = chain.assignment.unwrap();
        assert_eq!(link.teacher_id, f.subject_teacher.id);
        assert_eq!(link.status, AssignmentStatus::Active);
    }

    #[tokio::test]
    async fn test_mark_chain_follows_transferred_student() {
        let f = fixture().await;
        let mark = f
            .store
            .insert_mark(NewMark {
                student_id: f.student.id,
                assignment_id: f.assignment.id,
                recorded_by: Some(f.subject_teacher.id),
                assessment_type: "Quiz".into(),
                score: 6.0,
                max_score: 10.0,
                remarks: None,
                assessed_on: chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            })
            .await
            .unwrap();
        let (new_teacher, _) = f
            .store
            .insert_teacher(
                new_user("ct2@x.test", Role::Teacher, f.class.school_id),
                vec![],
            )
            .await
            .unwrap();
        let new_class = f
            .store
            .insert_class(f.class.school_id, "1B".into(), Some(new_teacher.id))
            .await
            .unwrap();
        f.store
            .update_student_class(f.student.id, new_class.id)
            .await
            .unwrap();

        let chain = OwnershipResolver::new(&f.store)
            .mark(mark.id)
            .await
            .unwrap()
            .chain;
        assert_eq!(chain.class_id(), Some(new_class.id));
        let link = chain.class.clone().unwrap();
        assert_eq!(link.class_teacher, Some(new_teacher.id));
        assert!(link.active_teachers.is_empty());
        assert_eq!(chain.assignment.unwrap().teacher_id, f.subject_teacher.id);
    }

    #[tokio::test]
    async fn test_student_task_chains_through_student_class() {
        let f = fixture().await;
        let task = f
            .store
            .insert_task(NewTask {
                teacher_id: f.subject_teacher.id,
                student_id: Some(f.student.id),
                class_id: None,
                title: "Essay".into(),
                description: None,
                due_date: None,
            })
            .await
            .unwrap();
        let chain = OwnershipResolver::new(&f.store)
            .task(task.id)
            .await
            .unwrap()
            .chain;
        assert_eq!(chain.class_id(), Some(f.class.id));
        assert_eq!(chain.assigner, Some(f.subject_teacher.id));
        assert!(!chain.class_wide);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let f = fixture().await;
        let resolver = OwnershipResolver::new(&f.store);
        assert!(matches!(
            resolver.class(ClassId::new()).await.unwrap_err(),
            AccessError::NotFound(_)
        ));
        assert!(matches!(
            resolver.mark(MarkId::new()).await.unwrap_err(),
            AccessError::NotFound(_)
        ));
        assert!(matches!(
            resolver
                .student_under_assignment(StudentProfileId::new(), f.assignment.id)
                .await
                .unwrap_err(),
            AccessError::NotFound(_)
        ));
    }
}
