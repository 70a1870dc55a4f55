//! Policy Evaluator.
//!
//! Every access-controlled operation is looked up in one table keyed by
//! (operation, role). Each cell lists the clauses that grant access; the
//! decision is a logical OR over them and the default is deny. An ADMIN
//! caller without a school is denied before the table is consulted.

use crate::caller::Caller;
use crate::chain::Chain;
use crate::error::{AccessError, AccessResult};
use schoolhub_models::Role;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateSchool,
    ListSchools,
    ViewSchool,
    UpdateSchool,
    DeleteSchool,
    AppointPrincipal,
    CreateClass,
    ListClasses,
    ViewClass,
    UpdateClass,
    DeleteClass,
    CreateSubject,
    ListSubjects,
    CreateSubjectAssignment,
    ViewSubjectAssignment,
    UpdateSubjectAssignment,
    DeleteSubjectAssignment,
    EnrolMember,
    ViewStudent,
    TransferStudent,
    RecordAttendance,
    ViewAttendanceRecord,
    ViewClassAttendance,
    ViewStudentAttendance,
    EnterMark,
    UpdateMark,
    DeleteMark,
    ViewMark,
    ViewStudentMarks,
    ViewAssignmentMarks,
    SubmitFeedback,
    MarkFeedbackRead,
    ViewFeedback,
    ViewStudentFeedback,
    CreateTask,
    UpdateTask,
    UpdateTaskStatus,
    DeleteTask,
    ViewTask,
    ViewStudentTasks,
}

impl Operation {
    pub const ALL: [Operation; 40] = [
        Operation::CreateSchool,
        Operation::ListSchools,
        Operation::ViewSchool,
        Operation::UpdateSchool,
        Operation::DeleteSchool,
        Operation::AppointPrincipal,
        Operation::CreateClass,
        Operation::ListClasses,
        Operation::ViewClass,
        Operation::UpdateClass,
        Operation::DeleteClass,
        Operation::CreateSubject,
        Operation::ListSubjects,
        Operation::CreateSubjectAssignment,
        Operation::ViewSubjectAssignment,
        Operation::UpdateSubjectAssignment,
        Operation::DeleteSubjectAssignment,
        Operation::EnrolMember,
        Operation::ViewStudent,
        Operation::TransferStudent,
        Operation::RecordAttendance,
        Operation::ViewAttendanceRecord,
        Operation::ViewClassAttendance,
        Operation::ViewStudentAttendance,
        Operation::EnterMark,
        Operation::UpdateMark,
        Operation::DeleteMark,
        Operation::ViewMark,
        Operation::ViewStudentMarks,
        Operation::ViewAssignmentMarks,
        Operation::SubmitFeedback,
        Operation::MarkFeedbackRead,
        Operation::ViewFeedback,
        Operation::ViewStudentFeedback,
        Operation::CreateTask,
        Operation::UpdateTask,
        Operation::UpdateTaskStatus,
        Operation::DeleteTask,
        Operation::ViewTask,
        Operation::ViewStudentTasks,
    ];

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateSchool => "create_school",
            Operation::ListSchools => "list_schools",
            Operation::ViewSchool => "view_school",
            Operation::UpdateSchool => "update_school",
            Operation::DeleteSchool => "delete_school",
            Operation::AppointPrincipal => "appoint_principal",
            Operation::CreateClass => "create_class",
            Operation::ListClasses => "list_classes",
            Operation::ViewClass => "view_class",
            Operation::UpdateClass => "update_class",
            Operation::DeleteClass => "delete_class",
            Operation::CreateSubject => "create_subject",
            Operation::ListSubjects => "list_subjects",
            Operation::CreateSubjectAssignment => "create_subject_assignment",
            Operation::ViewSubjectAssignment => "view_subject_assignment",
            Operation::UpdateSubjectAssignment => "update_subject_assignment",
            Operation::DeleteSubjectAssignment => "delete_subject_assignment",
            Operation::EnrolMember => "enrol_member",
            Operation::ViewStudent => "view_student",
            Operation::TransferStudent => "transfer_student",
            Operation::RecordAttendance => "record_attendance",
            Operation::ViewAttendanceRecord => "view_attendance_record",
            Operation::ViewClassAttendance => "view_class_attendance",
            Operation::ViewStudentAttendance => "view_student_attendance",
            Operation::EnterMark => "enter_mark",
            Operation::UpdateMark => "update_mark",
            Operation::DeleteMark => "delete_mark",
            Operation::ViewMark => "view_mark",
            Operation::ViewStudentMarks => "view_student_marks",
            Operation::ViewAssignmentMarks => "view_assignment_marks",
            Operation::SubmitFeedback => "submit_feedback",
            Operation::MarkFeedbackRead => "mark_feedback_read",
            Operation::ViewFeedback => "view_feedback",
            Operation::ViewStudentFeedback => "view_student_feedback",
            Operation::CreateTask => "create_task",
            Operation::UpdateTask => "update_task",
            Operation::UpdateTaskStatus => "update_task_status",
            Operation::DeleteTask => "delete_task",
            Operation::ViewTask => "view_task",
            Operation::ViewStudentTasks => "view_student_tasks",
        }
    }

    /// Human phrase for denial messages. Deliberately names no record.
    fn phrase(&self) -> &'static str {
        match self {
            Operation::CreateSchool => "create schools",
            Operation::ListSchools => "list schools",
            Operation::ViewSchool => "view this school",
            Operation::UpdateSchool => "update this school",
            Operation::DeleteSchool => "delete schools",
            Operation::AppointPrincipal => "appoint principals",
            Operation::CreateClass => "create classes in this school",
            Operation::ListClasses => "list classes of this school",
            Operation::ViewClass => "view this class",
            Operation::UpdateClass => "update this class",
            Operation::DeleteClass => "delete this class",
            Operation::CreateSubject => "create subjects in this school",
            Operation::ListSubjects => "list subjects of this school",
            Operation::CreateSubjectAssignment => "create subject assignments for this class",
            Operation::ViewSubjectAssignment => "view this subject assignment",
            Operation::UpdateSubjectAssignment => "update this subject assignment",
            Operation::DeleteSubjectAssignment => "delete this subject assignment",
            Operation::EnrolMember => "create users in this school",
            Operation::ViewStudent => "view this student",
            Operation::TransferStudent => "transfer this student",
            Operation::RecordAttendance => "record attendance for this class",
            Operation::ViewAttendanceRecord => "view this attendance record",
            Operation::ViewClassAttendance => "view attendance for this class",
            Operation::ViewStudentAttendance => "view this student's attendance",
            Operation::EnterMark => "enter marks for this student",
            Operation::UpdateMark => "update this mark",
            Operation::DeleteMark => "delete this mark",
            Operation::ViewMark => "view this mark",
            Operation::ViewStudentMarks => "view this student's marks",
            Operation::ViewAssignmentMarks => "view marks for this subject assignment",
            Operation::SubmitFeedback => "submit feedback for this student",
            Operation::MarkFeedbackRead => "mark this feedback as read",
            Operation::ViewFeedback => "view this feedback",
            Operation::ViewStudentFeedback => "view this student's feedback",
            Operation::CreateTask => "create this task",
            Operation::UpdateTask => "update this task",
            Operation::UpdateTaskStatus => "update the status of this task",
            Operation::DeleteTask => "delete this task",
            Operation::ViewTask => "view this task",
            Operation::ViewStudentTasks => "view this student's tasks",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single grant condition, evaluated against the caller and the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Always,
    /// The caller belongs to the chain's school.
    SameSchool,
    /// The caller is the designated class teacher of the chain's class.
    ClassTeacher,
    /// The caller is the teacher on the chain's subject assignment.
    AssignmentTeacher,
    /// The caller holds an ACTIVE subject assignment in the chain's class.
    ActiveInClass,
    /// The caller recorded the record.
    Recorder,
    /// The caller assigned the task.
    TaskAssigner,
    /// The record belongs to the caller's own student profile.
    OwnProfile,
    /// The caller's student profile is enrolled in the chain's class.
    Enrolled,
    /// The record addresses the caller's whole class.
    ClassWide,
}

impl Clause {
    pub fn holds(&self, caller: &Caller, chain: &Chain) -> bool {
        match self {
            Clause::Always => true,
            Clause::SameSchool => {
                caller.school_id().is_some() && caller.school_id() == chain.school_id
            }
            Clause::ClassTeacher => chain
                .class
                .as_ref()
                .and_then(|c| c.class_teacher)
                .is_some_and(|teacher| teacher == caller.user_id()),
            Clause::AssignmentTeacher => match (caller.teacher_profile(), &chain.assignment) {
                (Some(me), Some(assignment)) => assignment.teacher_id == me,
                _ => false,
            },
            Clause::ActiveInClass => match (caller.teacher_profile(), &chain.class) {
                (Some(me), Some(class)) => class.active_teachers.contains(&me),
                _ => false,
            },
            Clause::Recorder => {
                caller.teacher_profile().is_some() && chain.recorded_by == caller.teacher_profile()
            }
            Clause::TaskAssigner => {
                caller.teacher_profile().is_some() && chain.assigner == caller.teacher_profile()
            }
            Clause::OwnProfile => {
                caller.student_profile().is_some() && chain.student == caller.student_profile()
            }
            Clause::Enrolled => match (caller.student_profile(), &chain.class) {
                (Some(me), Some(class)) => class.enrolled.contains(&me),
                _ => false,
            },
            Clause::ClassWide => chain.class_wide && Clause::Enrolled.holds(caller, chain),
        }
    }
}

/// The decision table: which clauses grant `operation` to `role`.
pub fn grants(operation: Operation, role: Role) -> &'static [Clause] {
    use Clause::*;
    use Operation as Op;
    match (operation, role) {
        (
            Op::CreateSchool | Op::ListSchools | Op::DeleteSchool | Op::AppointPrincipal,
            Role::SuperAdmin,
        ) => &[Always],

        (Op::ViewSchool, Role::SuperAdmin) => &[Always],
        (Op::ViewSchool, _) => &[SameSchool],

        (Op::UpdateSchool, Role::SuperAdmin) => &[Always],
        (Op::UpdateSchool, Role::Admin) => &[SameSchool],

        (
            Op::CreateClass | Op::UpdateClass | Op::DeleteClass | Op::CreateSubject,
            Role::SuperAdmin,
        ) => &[Always],
        (Op::CreateClass | Op::UpdateClass | Op::DeleteClass | Op::CreateSubject, Role::Admin) => {
            &[SameSchool]
        }

        (Op::ListClasses, Role::SuperAdmin) => &[Always],
        (Op::ListClasses, Role::Admin | Role::Teacher) => &[SameSchool],

        (Op::ListSubjects, Role::SuperAdmin) => &[Always],
        (Op::ListSubjects, Role::Admin | Role::Teacher | Role::Student) => &[SameSchool],

        (Op::ViewClass, Role::SuperAdmin) => &[Always],
        (Op::ViewClass, Role::Admin) => &[SameSchool],
        (Op::ViewClass, Role::Teacher) => &[ClassTeacher, ActiveInClass],
        (Op::ViewClass, Role::Student) => &[Enrolled],

        (
            Op::CreateSubjectAssignment | Op::UpdateSubjectAssignment | Op::DeleteSubjectAssignment,
            Role::SuperAdmin,
        ) => &[Always],
        (
            Op::CreateSubjectAssignment | Op::UpdateSubjectAssignment | Op::DeleteSubjectAssignment,
            Role::Admin,
        ) => &[SameSchool],

        (Op::ViewSubjectAssignment, Role::SuperAdmin) => &[Always],
        (Op::ViewSubjectAssignment, Role::Admin) => &[SameSchool],
        (Op::ViewSubjectAssignment, Role::Teacher) => {
            &[AssignmentTeacher, ClassTeacher, ActiveInClass]
        }
        (Op::ViewSubjectAssignment, Role::Student) => &[Enrolled],

        // Super admins create principals instead.
        (Op::EnrolMember, Role::Admin) => &[SameSchool],

        (Op::ViewStudent, Role::SuperAdmin) => &[Always],
        (Op::ViewStudent, Role::Admin) => &[SameSchool],
        (Op::ViewStudent, Role::Teacher) => &[ClassTeacher, ActiveInClass],
        (Op::ViewStudent, Role::Student) => &[OwnProfile],

        (Op::TransferStudent, Role::SuperAdmin) => &[Always],
        (Op::TransferStudent, Role::Admin) => &[SameSchool],

        (Op::RecordAttendance, Role::SuperAdmin) => &[Always],
        (Op::RecordAttendance, Role::Admin) => &[SameSchool],
        (Op::RecordAttendance, Role::Teacher) => &[ClassTeacher],

        (Op::ViewAttendanceRecord, Role::SuperAdmin) => &[Always],
        (Op::ViewAttendanceRecord, Role::Admin) => &[SameSchool],
        (Op::ViewAttendanceRecord, Role::Teacher) => &[ClassTeacher, ActiveInClass, Recorder],
        (Op::ViewAttendanceRecord, Role::Student) => &[OwnProfile],

        (Op::ViewClassAttendance, Role::SuperAdmin) => &[Always],
        (Op::ViewClassAttendance, Role::Admin) => &[SameSchool],
        (Op::ViewClassAttendance, Role::Teacher) => &[ClassTeacher, ActiveInClass],

        (Op::ViewStudentAttendance, Role::SuperAdmin) => &[Always],
        (Op::ViewStudentAttendance, Role::Admin) => &[SameSchool],
        (Op::ViewStudentAttendance, Role::Teacher) => &[ClassTeacher, ActiveInClass],
        (Op::ViewStudentAttendance, Role::Student) => &[OwnProfile],

        (Op::EnterMark, Role::SuperAdmin) => &[Always],
        (Op::EnterMark, Role::Admin) => &[SameSchool],
        (Op::EnterMark, Role::Teacher) => &[ClassTeacher, AssignmentTeacher],

        (Op::UpdateMark | Op::DeleteMark, Role::SuperAdmin) => &[Always],
        (Op::UpdateMark | Op::DeleteMark, Role::Admin) => &[SameSchool],
        (Op::UpdateMark | Op::DeleteMark, Role::Teacher) => {
            &[ClassTeacher, AssignmentTeacher, Recorder]
        }

        (Op::ViewMark, Role::SuperAdmin) => &[Always],
        (Op::ViewMark, Role::Admin) => &[SameSchool],
        (Op::ViewMark, Role::Teacher) => &[ClassTeacher, AssignmentTeacher, ActiveInClass],
        (Op::ViewMark, Role::Student) => &[OwnProfile],

        (Op::ViewStudentMarks, Role::SuperAdmin) => &[Always],
        (Op::ViewStudentMarks, Role::Admin) => &[SameSchool],
        (Op::ViewStudentMarks, Role::Teacher) => &[ClassTeacher, ActiveInClass],
        (Op::ViewStudentMarks, Role::Student) => &[OwnProfile],

        (Op::ViewAssignmentMarks, Role::SuperAdmin) => &[Always],
        (Op::ViewAssignmentMarks, Role::Admin) => &[SameSchool],
        (Op::ViewAssignmentMarks, Role::Teacher) => {
            &[ClassTeacher, AssignmentTeacher, ActiveInClass]
        }

        (Op::SubmitFeedback, Role::Teacher) => &[AssignmentTeacher],
        (Op::MarkFeedbackRead, Role::Teacher) => &[ClassTeacher],

        (Op::ViewFeedback, Role::SuperAdmin) => &[Always],
        (Op::ViewFeedback, Role::Admin) => &[SameSchool],
        (Op::ViewFeedback, Role::Teacher) => &[ClassTeacher, AssignmentTeacher],
        (Op::ViewFeedback, Role::Student) => &[OwnProfile],

        (Op::ViewStudentFeedback, Role::SuperAdmin) => &[Always],
        (Op::ViewStudentFeedback, Role::Admin) => &[SameSchool],
        (Op::ViewStudentFeedback, Role::Teacher) => &[ClassTeacher, ActiveInClass],
        (Op::ViewStudentFeedback, Role::Student) => &[OwnProfile],

        (
            Op::CreateTask | Op::UpdateTask | Op::DeleteTask | Op::UpdateTaskStatus,
            Role::SuperAdmin,
        ) => &[Always],
        (
            Op::CreateTask | Op::UpdateTask | Op::DeleteTask | Op::UpdateTaskStatus,
            Role::Admin,
        ) => &[SameSchool],
        (
            Op::CreateTask | Op::UpdateTask | Op::DeleteTask | Op::UpdateTaskStatus,
            Role::Teacher,
        ) => &[TaskAssigner],
        (Op::UpdateTaskStatus, Role::Student) => &[OwnProfile],

        (Op::ViewTask, Role::SuperAdmin) => &[Always],
        (Op::ViewTask, Role::Admin) => &[SameSchool],
        (Op::ViewTask, Role::Teacher) => &[TaskAssigner, ActiveInClass],
        (Op::ViewTask, Role::Student) => &[OwnProfile, ClassWide],

        (Op::ViewStudentTasks, Role::SuperAdmin) => &[Always],
        (Op::ViewStudentTasks, Role::Admin) => &[SameSchool],
        (Op::ViewStudentTasks, Role::Teacher) => &[ActiveInClass],
        (Op::ViewStudentTasks, Role::Student) => &[OwnProfile],

        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> AccessResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AccessError::Forbidden(reason)),
        }
    }
}

/// Decides whether `caller` may perform `operation` on the record `chain`
/// describes. Pure: no I/O, no logging.
pub fn authorize(operation: Operation, caller: &Caller, chain: &Chain) -> Decision {
    if let Caller::Principal {
        school_id: None, ..
    } = caller
    {
        return Decision::Deny("Principal is not associated with a school".to_string());
    }

    let role = caller.role();
    if grants(operation, role)
        .iter()
        .any(|clause| clause.holds(caller, chain))
    {
        Decision::Allow
    } else {
        Decision::Deny(format!(
            "{} is not permitted to {}",
            role_label(role),
            operation.phrase()
        ))
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "Super admin",
        Role::Admin => "Principal",
        Role::Teacher => "Teacher",
        Role::Student => "Student",
        Role::Parent => "Parent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AssignmentLink, ClassLink};
    use schoolhub_models::{
        AssignmentStatus, ClassId, SchoolId, StudentProfileId, SubjectAssignmentId,
        TeacherProfileId, UserId,
    };
    use std::collections::HashSet;

    const SCHOOL: SchoolId = SchoolId::from_u128(1);
    const OTHER_SCHOOL: SchoolId = SchoolId::from_u128(2);
    const CLASS: ClassId = ClassId::from_u128(10);

    const CLASS_TEACHER_USER: UserId = UserId::from_u128(100);
    const CLASS_TEACHER: TeacherProfileId = TeacherProfileId::from_u128(101);
    const SUBJECT_TEACHER_USER: UserId = UserId::from_u128(200);
    const SUBJECT_TEACHER: TeacherProfileId = TeacherProfileId::from_u128(201);
    const OUTSIDER_USER: UserId = UserId::from_u128(300);
    const OUTSIDER: TeacherProfileId = TeacherProfileId::from_u128(301);

    const STUDENT_USER: UserId = UserId::from_u128(400);
    const STUDENT: StudentProfileId = StudentProfileId::from_u128(10);
    const OTHER_STUDENT: StudentProfileId = StudentProfileId::from_u128(11);

    fn super_admin() -> Caller {
        Caller::SuperAdmin {
            user_id: UserId::from_u128(1),
        }
    }

    fn principal(school_id: Option<SchoolId>) -> Caller {
        Caller::Principal {
            user_id: UserId::from_u128(2),
            school_id,
        }
    }

    fn teacher(user_id: UserId, profile_id: TeacherProfileId) -> Caller {
        Caller::Teacher {
            user_id,
            school_id: SCHOOL,
            profile_id,
        }
    }

    fn student(profile_id: StudentProfileId) -> Caller {
        Caller::Student {
            user_id: STUDENT_USER,
            school_id: SCHOOL,
            profile_id,
            class_id: CLASS,
        }
    }

    fn parent() -> Caller {
        Caller::Parent {
            user_id: UserId::from_u128(500),
            school_id: SCHOOL,
        }
    }

    fn class_chain(school: SchoolId) -> Chain {
        Chain {
            school_id: Some(school),
            class: Some(ClassLink {
                class_id: CLASS,
                class_teacher: Some(CLASS_TEACHER_USER),
                enrolled: HashSet::from([STUDENT, OTHER_STUDENT]),
                active_teachers: HashSet::from([SUBJECT_TEACHER]),
            }),
            ..Default::default()
        }
    }

    fn assignment_chain(teacher: TeacherProfileId) -> Chain {
        Chain {
            assignment: Some(AssignmentLink {
                assignment_id: SubjectAssignmentId::from_u128(50),
                teacher_id: teacher,
                status: AssignmentStatus::Active,
            }),
            ..class_chain(SCHOOL)
        }
    }

    fn allowed(op: Operation, caller: &Caller, chain: &Chain) -> bool {
        authorize(op, caller, chain).is_allowed()
    }

    #[test]
    fn test_principal_without_school_is_denied_everything() {
        let caller = principal(None);
        for op in Operation::ALL {
            let decision = authorize(op, &caller, &Chain::unscoped());
            assert_eq!(
                decision,
                Decision::Deny("Principal is not associated with a school".to_string()),
                "{op}"
            );
        }
    }

    #[test]
    fn test_super_admin_is_unscoped_except_member_enrolment_and_feedback_writes() {
        let denied = [
            Operation::EnrolMember,
            Operation::SubmitFeedback,
            Operation::MarkFeedbackRead,
        ];
        for op in Operation::ALL {
            assert_eq!(
                allowed(op, &super_admin(), &class_chain(OTHER_SCHOOL)),
                !denied.contains(&op),
                "{op}"
            );
        }
    }

    #[test]
    fn test_principal_is_scoped_to_own_school() {
        let admin = principal(Some(SCHOOL));
        for op in [
            Operation::CreateClass,
            Operation::CreateSubjectAssignment,
            Operation::UpdateSubjectAssignment,
            Operation::RecordAttendance,
            Operation::ViewClassAttendance,
            Operation::EnterMark,
            Operation::ViewMark,
            Operation::CreateTask,
        ] {
            assert!(allowed(op, &admin, &class_chain(SCHOOL)), "{op}");
            assert!(!allowed(op, &admin, &class_chain(OTHER_SCHOOL)), "{op}");
        }
    }

    #[test]
    fn test_principal_cannot_create_schools_or_write_feedback() {
        let admin = principal(Some(SCHOOL));
        for op in [
            Operation::CreateSchool,
            Operation::ListSchools,
            Operation::DeleteSchool,
            Operation::AppointPrincipal,
            Operation::SubmitFeedback,
            Operation::MarkFeedbackRead,
        ] {
            assert!(!allowed(op, &admin, &class_chain(SCHOOL)), "{op}");
        }
        assert!(allowed(Operation::UpdateSchool, &admin, &Chain::school(SCHOOL)));
        assert!(!allowed(
            Operation::UpdateSchool,
            &admin,
            &Chain::school(OTHER_SCHOOL)
        ));
    }

    #[test]
    fn test_class_teacher_records_attendance_subject_teacher_only_views() {
        let chain = class_chain(SCHOOL);
        let class_teacher = teacher(CLASS_TEACHER_USER, CLASS_TEACHER);
        let subject_teacher = teacher(SUBJECT_TEACHER_USER, SUBJECT_TEACHER);
        let outsider = teacher(OUTSIDER_USER, OUTSIDER);

        assert!(allowed(Operation::RecordAttendance, &class_teacher, &chain));
        assert!(allowed(Operation::ViewClassAttendance, &class_teacher, &chain));

        assert!(!allowed(Operation::RecordAttendance, &subject_teacher, &chain));
        assert!(allowed(Operation::ViewClassAttendance, &subject_teacher, &chain));

        assert!(!allowed(Operation::RecordAttendance, &outsider, &chain));
        assert!(!allowed(Operation::ViewClassAttendance, &outsider, &chain));
    }

    #[test]
    fn test_recorder_may_view_attendance_after_leaving_class() {
        let outsider = teacher(OUTSIDER_USER, OUTSIDER);
        let chain = class_chain(SCHOOL)
            .with_student(STUDENT)
            .with_recorder(Some(OUTSIDER));
        assert!(allowed(Operation::ViewAttendanceRecord, &outsider, &chain));
        assert!(!allowed(
            Operation::ViewAttendanceRecord,
            &outsider,
            &class_chain(SCHOOL).with_student(STUDENT)
        ));
    }

    #[test]
    fn test_student_sees_only_own_records() {
        let me = student(STUDENT);
        let own = class_chain(SCHOOL).with_student(STUDENT);
        let other = class_chain(SCHOOL).with_student(OTHER_STUDENT);
        for op in [
            Operation::ViewStudent,
            Operation::ViewAttendanceRecord,
            Operation::ViewStudentAttendance,
            Operation::ViewMark,
            Operation::ViewStudentMarks,
            Operation::ViewFeedback,
            Operation::ViewStudentFeedback,
            Operation::ViewStudentTasks,
        ] {
            assert!(allowed(op, &me, &own), "{op}");
            assert!(!allowed(op, &me, &other), "{op}");
        }
    }

    #[test]
    fn test_student_never_writes_records() {
        let me = student(STUDENT);
        let own = assignment_chain(SUBJECT_TEACHER).with_student(STUDENT);
        for op in [
            Operation::RecordAttendance,
            Operation::EnterMark,
            Operation::UpdateMark,
            Operation::DeleteMark,
            Operation::SubmitFeedback,
            Operation::MarkFeedbackRead,
            Operation::CreateTask,
            Operation::UpdateTask,
            Operation::DeleteTask,
        ] {
            assert!(!allowed(op, &me, &own), "{op}");
        }
    }

    #[test]
    fn test_mark_entry_by_class_teacher_or_assignment_teacher() {
        let chain = assignment_chain(SUBJECT_TEACHER).with_student(STUDENT);
        assert!(allowed(
            Operation::EnterMark,
            &teacher(CLASS_TEACHER_USER, CLASS_TEACHER),
            &chain
        ));
        assert!(allowed(
            Operation::EnterMark,
            &teacher(SUBJECT_TEACHER_USER, SUBJECT_TEACHER),
            &chain
        ));
        assert!(!allowed(
            Operation::EnterMark,
            &teacher(OUTSIDER_USER, OUTSIDER),
            &chain
        ));
    }

    #[test]
    fn test_original_recorder_may_update_but_not_enter_marks() {
        let outsider = teacher(OUTSIDER_USER, OUTSIDER);
        let chain = assignment_chain(SUBJECT_TEACHER)
            .with_student(STUDENT)
            .with_recorder(Some(OUTSIDER));
        assert!(allowed(Operation::UpdateMark, &outsider, &chain));
        assert!(allowed(Operation::DeleteMark, &outsider, &chain));
        assert!(!allowed(Operation::EnterMark, &outsider, &chain));
    }

    #[test]
    fn test_feedback_rules() {
        let chain = assignment_chain(SUBJECT_TEACHER).with_student(STUDENT);
        let class_teacher = teacher(CLASS_TEACHER_USER, CLASS_TEACHER);
        let subject_teacher = teacher(SUBJECT_TEACHER_USER, SUBJECT_TEACHER);

        assert!(allowed(Operation::SubmitFeedback, &subject_teacher, &chain));
        assert!(!allowed(Operation::SubmitFeedback, &class_teacher, &chain));

        assert!(allowed(Operation::MarkFeedbackRead, &class_teacher, &chain));
        assert!(!allowed(Operation::MarkFeedbackRead, &subject_teacher, &chain));

        assert!(allowed(Operation::ViewFeedback, &class_teacher, &chain));
        assert!(allowed(Operation::ViewFeedback, &subject_teacher, &chain));

        // Another subject teacher active in the class does not see it.
        let other_assignment = assignment_chain(OUTSIDER).with_student(STUDENT);
        assert!(!allowed(Operation::ViewFeedback, &subject_teacher, &other_assignment));
    }

    #[test]
    fn test_task_rules() {
        let assigned = Chain {
            assigner: Some(SUBJECT_TEACHER),
            ..class_chain(SCHOOL).with_student(STUDENT)
        };
        let assigner = teacher(SUBJECT_TEACHER_USER, SUBJECT_TEACHER);
        let class_teacher = teacher(CLASS_TEACHER_USER, CLASS_TEACHER);

        assert!(allowed(Operation::UpdateTask, &assigner, &assigned));
        assert!(!allowed(Operation::UpdateTask, &class_teacher, &assigned));
        assert!(!allowed(Operation::UpdateTask, &student(STUDENT), &assigned));
        assert!(allowed(Operation::UpdateTaskStatus, &student(STUDENT), &assigned));
        assert!(!allowed(
            Operation::UpdateTaskStatus,
            &student(OTHER_STUDENT),
            &assigned
        ));

        let class_wide = Chain {
            assigner: Some(SUBJECT_TEACHER),
            class_wide: true,
            ..class_chain(SCHOOL)
        };
        assert!(allowed(Operation::ViewTask, &student(OTHER_STUDENT), &class_wide));
        assert!(!allowed(
            Operation::UpdateTaskStatus,
            &student(OTHER_STUDENT),
            &class_wide
        ));
    }

    #[test]
    fn test_task_visibility_for_teachers_follows_active_assignments() {
        let by_outsider = Chain {
            assigner: Some(OUTSIDER),
            ..class_chain(SCHOOL).with_student(STUDENT)
        };
        let subject_teacher = teacher(SUBJECT_TEACHER_USER, SUBJECT_TEACHER);
        let class_teacher = teacher(CLASS_TEACHER_USER, CLASS_TEACHER);
        let outsider = teacher(OUTSIDER_USER, OUTSIDER);

        assert!(allowed(Operation::ViewTask, &subject_teacher, &by_outsider));
        assert!(allowed(Operation::ViewTask, &outsider, &by_outsider));
        assert!(!allowed(Operation::ViewTask, &class_teacher, &by_outsider));
        assert!(!allowed(Operation::UpdateTask, &subject_teacher, &by_outsider));

        let student_chain = class_chain(SCHOOL).with_student(STUDENT);
        assert!(allowed(Operation::ViewStudentTasks, &subject_teacher, &student_chain));
        assert!(!allowed(Operation::ViewStudentTasks, &class_teacher, &student_chain));
        assert!(!allowed(Operation::ViewStudentTasks, &outsider, &student_chain));
    }

    #[test]
    fn test_parent_holds_no_record_grants() {
        let chain = assignment_chain(SUBJECT_TEACHER).with_student(STUDENT);
        for op in Operation::ALL {
            let expected = op == Operation::ViewSchool;
            assert_eq!(allowed(op, &parent(), &chain), expected, "{op}");
        }
    }

    #[test]
    fn test_denial_message_is_generic() {
        let decision = authorize(
            Operation::ViewMark,
            &student(STUDENT),
            &class_chain(SCHOOL).with_student(OTHER_STUDENT),
        );
        assert_eq!(
            decision,
            Decision::Deny("Student is not permitted to view this mark".to_string())
        );
        assert!(matches!(
            decision.into_result(),
            Err(AccessError::Forbidden(_))
        ));
    }

    #[test]
    fn test_teacher_from_other_school_matches_no_clause() {
        let foreign = Caller::Teacher {
            user_id: UserId::from_u128(900),
            school_id: OTHER_SCHOOL,
            profile_id: TeacherProfileId::from_u128(901),
        };
        for op in Operation::ALL {
            assert!(
                !allowed(op, &foreign, &assignment_chain(SUBJECT_TEACHER).with_student(STUDENT)),
                "{op}"
            );
        }
    }
}
