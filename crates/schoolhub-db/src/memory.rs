//! In-memory [`Store`] for tests and demos.
//!
//! All tables sit behind one `RwLock`, so every write is atomic with respect
//! to every other. The same unique keys and reference rules as the SQL
//! schema are enforced and reported as [`StoreError::Conflict`]. Nothing is
//! durable.

use crate::store::{
    AcademicStore, RecordStore, SchoolStore, Store, StoreError, StoreResult, UserStore,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use schoolhub_models::{
    AssignmentKey, AssignmentStatus, Attendance, AttendanceId, Class, ClassId, Feedback,
    FeedbackId, Mark, MarkId, NewAttendance, NewMark, NewTask, NewUser, School, SchoolId,
    StudentProfile, StudentProfileId, Subject, SubjectAssignment, SubjectAssignmentId, SubjectId,
    Task, TaskId, TaskStatus, TeacherProfile, TeacherProfileId, User, UserId,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    teacher_profiles: HashMap<TeacherProfileId, TeacherProfile>,
    student_profiles: HashMap<StudentProfileId, StudentProfile>,
    schools: HashMap<SchoolId, School>,
    classes: HashMap<ClassId, Class>,
    subjects: HashMap<SubjectId, Subject>,
    assignments: HashMap<SubjectAssignmentId, SubjectAssignment>,
    attendance: HashMap<AttendanceId, Attendance>,
    marks: HashMap<MarkId, Mark>,
    feedback: HashMap<FeedbackId, Feedback>,
    tasks: HashMap<TaskId, Task>,
}

impl Tables {
    fn check_new_user(&self, user: &NewUser) -> StoreResult<()> {
        let email = user.email.to_lowercase();
        if self.users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(conflict("user already exists"));
        }
        if user.role.is_school_scoped() && user.school_id.is_none() {
            return Err(conflict("user violates a data constraint"));
        }
        if let Some(school_id) = user.school_id {
            if !self.schools.contains_key(&school_id) {
                return Err(conflict("user references a missing school"));
            }
        }
        Ok(())
    }

    fn push_user(&mut self, user: NewUser) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            school_id: user.school_id,
            enabled: true,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        user
    }

    fn check_class_teacher(&self, teacher: Option<UserId>) -> StoreResult<()> {
        match teacher {
            Some(id) if !self.users.contains_key(&id) => {
                Err(conflict("class references a missing user"))
            }
            _ => Ok(()),
        }
    }

    fn check_assignment_refs(&self, key: &AssignmentKey) -> StoreResult<()> {
        if !self.classes.contains_key(&key.class_id)
            || !self.subjects.contains_key(&key.subject_id)
            || !self.teacher_profiles.contains_key(&key.teacher_id)
        {
            return Err(conflict("subject assignment references a missing row"));
        }
        Ok(())
    }
}

fn conflict(message: &str) -> StoreError {
    StoreError::Conflict(message.to_string())
}

fn missing(what: &str) -> StoreError {
    StoreError::NotFound(what.to_string())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips a user's `enabled` flag. Accounts are never disabled through
    /// the API, only by operators, so this lives outside the trait.
    pub async fn set_user_enabled(&self, id: UserId, enabled: bool) {
        if let Some(user) = self.tables.write().await.users.get_mut(&id) {
            user.enabled = enabled;
        }
    }

    /// Clears a user's school, bypassing the constraint that school-scoped
    /// roles carry one. Models rows left behind by a deleted school.
    pub async fn detach_from_school(&self, id: UserId) {
        if let Some(user) = self.tables.write().await.users.get_mut(&id) {
            user.school_id = None;
        }
    }

    /// Drops a teacher or student profile, leaving the user row behind.
    pub async fn remove_profiles_of(&self, user_id: UserId) {
        let mut t = self.tables.write().await;
        t.teacher_profiles.retain(|_, p| p.user_id != user_id);
        t.student_profiles.retain(|_, p| p.user_id != user_id);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        let t = self.tables.read().await;
        Ok(t.users
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self.find_user_by_email(email).await?.is_some())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        t.check_new_user(&user)?;
        Ok(t.push_user(user))
    }

    async fn insert_teacher(
        &self,
        user: NewUser,
        subjects: Vec<String>,
    ) -> StoreResult<(User, TeacherProfile)> {
        let mut t = self.tables.write().await;
        t.check_new_user(&user)?;
        let user = t.push_user(user);
        let profile = TeacherProfile {
            id: TeacherProfileId::new(),
            user_id: user.id,
            subjects,
        };
        t.teacher_profiles.insert(profile.id, profile.clone());
        Ok((user, profile))
    }

    async fn insert_student(
        &self,
        user: NewUser,
        class_id: ClassId,
    ) -> StoreResult<(User, StudentProfile)> {
        let mut t = self.tables.write().await;
        t.check_new_user(&user)?;
        if !t.classes.contains_key(&class_id) {
            return Err(conflict("student profile references a missing class"));
        }
        let user = t.push_user(user);
        let profile = StudentProfile {
            id: StudentProfileId::new(),
            user_id: user.id,
            class_id,
        };
        t.student_profiles.insert(profile.id, profile.clone());
        Ok((user, profile))
    }

    async fn find_teacher_profile(
        &self,
        id: TeacherProfileId,
    ) -> StoreResult<Option<TeacherProfile>> {
        Ok(self.tables.read().await.teacher_profiles.get(&id).cloned())
    }

    async fn find_teacher_profile_by_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<TeacherProfile>> {
        let t = self.tables.read().await;
        Ok(t.teacher_profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn find_student_profile(
        &self,
        id: StudentProfileId,
    ) -> StoreResult<Option<StudentProfile>> {
        Ok(self.tables.read().await.student_profiles.get(&id).cloned())
    }

    async fn find_student_profile_by_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<StudentProfile>> {
        let t = self.tables.read().await;
        Ok(t.student_profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list_students_in_class(&self, class_id: ClassId) -> StoreResult<Vec<StudentProfile>> {
        let t = self.tables.read().await;
        Ok(t.student_profiles
            .values()
            .filter(|p| p.class_id == class_id)
            .cloned()
            .collect())
    }

    async fn update_student_class(
        &self,
        id: StudentProfileId,
        class_id: ClassId,
    ) -> StoreResult<StudentProfile> {
        let mut t = self.tables.write().await;
        if !t.classes.contains_key(&class_id) {
            return Err(conflict("student profile references a missing class"));
        }
        let profile = t
            .student_profiles
            .get_mut(&id)
            .ok_or_else(|| missing("student profile"))?;
        profile.class_id = class_id;
        Ok(profile.clone())
    }
}

#[async_trait]
impl SchoolStore for MemoryStore {
    async fn find_school(&self, id: SchoolId) -> StoreResult<Option<School>> {
        Ok(self.tables.read().await.schools.get(&id).cloned())
    }

    async fn list_schools(&self) -> StoreResult<Vec<School>> {
        let t = self.tables.read().await;
        let mut schools: Vec<School> = t.schools.values().cloned().collect();
        schools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(schools)
    }

    async fn insert_school(&self, name: String, address: Option<String>) -> StoreResult<School> {
        let now = Utc::now();
        let school = School {
            id: SchoolId::new(),
            name,
            address,
            principal_id: None,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .schools
            .insert(school.id, school.clone());
        Ok(school)
    }

    async fn update_school(&self, school: &School) -> StoreResult<School> {
        let mut t = self.tables.write().await;
        let row = t.schools.get_mut(&school.id).ok_or_else(|| missing("school"))?;
        row.name = school.name.clone();
        row.address = school.address.clone();
        row.principal_id = school.principal_id;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_school(&self, id: SchoolId) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        let referenced = t.users.values().any(|u| u.school_id == Some(id))
            || t.classes.values().any(|c| c.school_id == id)
            || t.subjects.values().any(|s| s.school_id == id);
        if referenced {
            return Err(conflict("school is referenced by other records"));
        }
        t.schools.remove(&id);
        Ok(())
    }

    async fn appoint_principal(&self, school_id: SchoolId, user: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if !t.schools.contains_key(&school_id) {
            return Err(missing("school"));
        }
        t.check_new_user(&user)?;
        let principal = t.push_user(user);
        if let Some(school) = t.schools.get_mut(&school_id) {
            school.principal_id = Some(principal.id);
            school.updated_at = Utc::now();
        }
        Ok(principal)
    }

    async fn find_class(&self, id: ClassId) -> StoreResult<Option<Class>> {
        Ok(self.tables.read().await.classes.get(&id).cloned())
    }

    async fn list_classes(&self, school_id: SchoolId) -> StoreResult<Vec<Class>> {
        let t = self.tables.read().await;
        let mut classes: Vec<Class> = t
            .classes
            .values()
            .filter(|c| c.school_id == school_id)
            .cloned()
            .collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(classes)
    }

    async fn insert_class(
        &self,
        school_id: SchoolId,
        name: String,
        class_teacher_id: Option<UserId>,
    ) -> StoreResult<Class> {
        let mut t = self.tables.write().await;
        if !t.schools.contains_key(&school_id) {
            return Err(conflict("class references a missing school"));
        }
        if t
            .classes
            .values()
            .any(|c| c.school_id == school_id && c.name == name)
        {
            return Err(conflict("class already exists"));
        }
        t.check_class_teacher(class_teacher_id)?;
        let now = Utc::now();
        let class = Class {
            id: ClassId::new(),
            school_id,
            name,
            class_teacher_id,
            created_at: now,
            updated_at: now,
        };
        t.classes.insert(class.id, class.clone());
        Ok(class)
    }

    async fn update_class(&self, class: &Class) -> StoreResult<Class> {
        let mut t = self.tables.write().await;
        if t.classes.values().any(|c| {
            c.id != class.id && c.school_id == class.school_id && c.name == class.name
        }) {
            return Err(conflict("class already exists"));
        }
        t.check_class_teacher(class.class_teacher_id)?;
        let row = t.classes.get_mut(&class.id).ok_or_else(|| missing("class"))?;
        row.name = class.name.clone();
        row.class_teacher_id = class.class_teacher_id;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_class(&self, id: ClassId) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        let referenced = t.student_profiles.values().any(|p| p.class_id == id)
            || t.assignments.values().any(|a| a.class_id == id)
            || t.attendance.values().any(|a| a.class_id == id)
            || t.tasks.values().any(|task| task.class_id == Some(id));
        if referenced {
            return Err(conflict("class is referenced by other records"));
        }
        t.classes.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AcademicStore for MemoryStore {
    async fn find_subject(&self, id: SubjectId) -> StoreResult<Option<Subject>> {
        Ok(self.tables.read().await.subjects.get(&id).cloned())
    }

    async fn list_subjects(&self, school_id: SchoolId) -> StoreResult<Vec<Subject>> {
        let t = self.tables.read().await;
        let mut subjects: Vec<Subject> = t
            .subjects
            .values()
            .filter(|s| s.school_id == school_id)
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn insert_subject(
        &self,
        school_id: SchoolId,
        name: String,
        code: Option<String>,
    ) -> StoreResult<Subject> {
        let mut t = self.tables.write().await;
        if !t.schools.contains_key(&school_id) {
            return Err(conflict("subject references a missing school"));
        }
        if t
            .subjects
            .values()
            .any(|s| s.school_id == school_id && s.name == name)
        {
            return Err(conflict("subject already exists"));
        }
        let subject = Subject {
            id: SubjectId::new(),
            school_id,
            name,
            code,
            created_at: Utc::now(),
        };
        t.subjects.insert(subject.id, subject.clone());
        Ok(subject)
    }

    async fn find_assignment(
        &self,
        id: SubjectAssignmentId,
    ) -> StoreResult<Option<SubjectAssignment>> {
        Ok(self.tables.read().await.assignments.get(&id).cloned())
    }

    async fn list_assignments_by_class(
        &self,
        class_id: ClassId,
    ) -> StoreResult<Vec<SubjectAssignment>> {
        let t = self.tables.read().await;
        let mut assignments: Vec<SubjectAssignment> = t
            .assignments
            .values()
            .filter(|a| a.class_id == class_id)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| (&a.academic_year, &a.term).cmp(&(&b.academic_year, &b.term)));
        Ok(assignments)
    }

    async fn insert_assignment(
        &self,
        key: AssignmentKey,
        status: AssignmentStatus,
    ) -> StoreResult<SubjectAssignment> {
        let mut t = self.tables.write().await;
        t.check_assignment_refs(&key)?;
        if t.assignments.values().any(|a| a.key() == key) {
            return Err(conflict("subject assignment already exists"));
        }
        let now = Utc::now();
        let assignment = SubjectAssignment {
            id: SubjectAssignmentId::new(),
            class_id: key.class_id,
            subject_id: key.subject_id,
            teacher_id: key.teacher_id,
            academic_year: key.academic_year,
            term: key.term,
            status,
            created_at: now,
            updated_at: now,
        };
        t.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn update_assignment(
        &self,
        assignment: &SubjectAssignment,
    ) -> StoreResult<SubjectAssignment> {
        let mut t = self.tables.write().await;
        let key = assignment.key();
        t.check_assignment_refs(&key)?;
        if t
            .assignments
            .values()
            .any(|a| a.id != assignment.id && a.key() == key)
        {
            return Err(conflict("subject assignment already exists"));
        }
        let row = t
            .assignments
            .get_mut(&assignment.id)
            .ok_or_else(|| missing("subject assignment"))?;
        *row = SubjectAssignment {
            created_at: row.created_at,
            updated_at: Utc::now(),
            ..assignment.clone()
        };
        Ok(row.clone())
    }

    async fn delete_assignment(&self, id: SubjectAssignmentId) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        let referenced = t.marks.values().any(|m| m.assignment_id == id)
            || t.feedback.values().any(|f| f.assignment_id == id);
        if referenced {
            return Err(conflict("subject assignment is referenced by other records"));
        }
        t.assignments.remove(&id);
        Ok(())
    }

    async fn assignment_exists(&self, key: &AssignmentKey) -> StoreResult<bool> {
        let t = self.tables.read().await;
        Ok(t.assignments.values().any(|a| &a.key() == key))
    }

    async fn active_teacher_ids(&self, class_id: ClassId) -> StoreResult<Vec<TeacherProfileId>> {
        let t = self.tables.read().await;
        let mut ids: Vec<TeacherProfileId> = t
            .assignments
            .values()
            .filter(|a| a.class_id == class_id && a.is_active())
            .map(|a| a.teacher_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_attendance(&self, id: AttendanceId) -> StoreResult<Option<Attendance>> {
        Ok(self.tables.read().await.attendance.get(&id).cloned())
    }

    async fn upsert_attendance(&self, rows: Vec<NewAttendance>) -> StoreResult<Vec<Attendance>> {
        let mut t = self.tables.write().await;
        for row in &rows {
            if !t.student_profiles.contains_key(&row.student_id)
                || !t.classes.contains_key(&row.class_id)
            {
                return Err(conflict("attendance references a missing row"));
            }
        }
        let now = Utc::now();
        let mut written = Vec::with_capacity(rows.len());
        for row in rows {
            let existing = t
                .attendance
                .values_mut()
                .find(|a| a.student_id == row.student_id && a.attendance_date == row.attendance_date);
            let saved = match existing {
                Some(record) => {
                    record.class_id = row.class_id;
                    record.recorded_by = row.recorded_by;
                    record.status = row.status;
                    record.remarks = row.remarks;
                    record.updated_at = now;
                    record.clone()
                }
                None => {
                    let record = Attendance {
                        id: AttendanceId::new(),
                        student_id: row.student_id,
                        class_id: row.class_id,
                        recorded_by: row.recorded_by,
                        attendance_date: row.attendance_date,
                        status: row.status,
                        remarks: row.remarks,
                        created_at: now,
                        updated_at: now,
                    };
                    t.attendance.insert(record.id, record.clone());
                    record
                }
            };
            written.push(saved);
        }
        Ok(written)
    }

    async fn list_class_attendance(
        &self,
        class_id: ClassId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Attendance>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Attendance> = t
            .attendance
            .values()
            .filter(|a| a.class_id == class_id && (from..=to).contains(&a.attendance_date))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.attendance_date, a.student_id));
        Ok(rows)
    }

    async fn list_student_attendance(
        &self,
        student_id: StudentProfileId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Attendance>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Attendance> = t
            .attendance
            .values()
            .filter(|a| a.student_id == student_id && (from..=to).contains(&a.attendance_date))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.attendance_date);
        Ok(rows)
    }

    async fn find_mark(&self, id: MarkId) -> StoreResult<Option<Mark>> {
        Ok(self.tables.read().await.marks.get(&id).cloned())
    }

    async fn insert_mark(&self, mark: NewMark) -> StoreResult<Mark> {
        let mut t = self.tables.write().await;
        if !t.student_profiles.contains_key(&mark.student_id)
            || !t.assignments.contains_key(&mark.assignment_id)
        {
            return Err(conflict("mark references a missing row"));
        }
        if mark.score < 0.0 || mark.score > mark.max_score {
            return Err(conflict("mark violates a data constraint"));
        }
        let now = Utc::now();
        let saved = Mark {
            id: MarkId::new(),
            student_id: mark.student_id,
            assignment_id: mark.assignment_id,
            recorded_by: mark.recorded_by,
            assessment_type: mark.assessment_type,
            score: mark.score,
            max_score: mark.max_score,
            remarks: mark.remarks,
            assessed_on: mark.assessed_on,
            created_at: now,
            updated_at: now,
        };
        t.marks.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update_mark(&self, mark: &Mark) -> StoreResult<Mark> {
        if mark.score < 0.0 || mark.score > mark.max_score {
            return Err(conflict("mark violates a data constraint"));
        }
        let mut t = self.tables.write().await;
        let row = t.marks.get_mut(&mark.id).ok_or_else(|| missing("mark"))?;
        row.assessment_type = mark.assessment_type.clone();
        row.score = mark.score;
        row.max_score = mark.max_score;
        row.remarks = mark.remarks.clone();
        row.assessed_on = mark.assessed_on;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_mark(&self, id: MarkId) -> StoreResult<()> {
        self.tables.write().await.marks.remove(&id);
        Ok(())
    }

    async fn list_marks_by_student(&self, student_id: StudentProfileId) -> StoreResult<Vec<Mark>> {
        let t = self.tables.read().await;
        let mut marks: Vec<Mark> = t
            .marks
            .values()
            .filter(|m| m.student_id == student_id)
            .cloned()
            .collect();
        marks.sort_by_key(|m| m.assessed_on);
        Ok(marks)
    }

    async fn list_marks_by_assignment(
        &self,
        assignment_id: SubjectAssignmentId,
    ) -> StoreResult<Vec<Mark>> {
        let t = self.tables.read().await;
        let mut marks: Vec<Mark> = t
            .marks
            .values()
            .filter(|m| m.assignment_id == assignment_id)
            .cloned()
            .collect();
        marks.sort_by_key(|m| m.assessed_on);
        Ok(marks)
    }

    async fn find_feedback(&self, id: FeedbackId) -> StoreResult<Option<Feedback>> {
        Ok(self.tables.read().await.feedback.get(&id).cloned())
    }

    async fn insert_feedback(
        &self,
        student_id: StudentProfileId,
        assignment_id: SubjectAssignmentId,
        content: String,
    ) -> StoreResult<Feedback> {
        let mut t = self.tables.write().await;
        if !t.student_profiles.contains_key(&student_id)
            || !t.assignments.contains_key(&assignment_id)
        {
            return Err(conflict("feedback references a missing row"));
        }
        let feedback = Feedback {
            id: FeedbackId::new(),
            student_id,
            assignment_id,
            content,
            is_read: false,
            created_at: Utc::now(),
        };
        t.feedback.insert(feedback.id, feedback.clone());
        Ok(feedback)
    }

    async fn mark_feedback_read(&self, id: FeedbackId) -> StoreResult<Feedback> {
        let mut t = self.tables.write().await;
        let row = t.feedback.get_mut(&id).ok_or_else(|| missing("feedback"))?;
        row.is_read = true;
        Ok(row.clone())
    }

    async fn list_feedback_by_student(
        &self,
        student_id: StudentProfileId,
    ) -> StoreResult<Vec<Feedback>> {
        let t = self.tables.read().await;
        let mut feedback: Vec<Feedback> = t
            .feedback
            .values()
            .filter(|f| f.student_id == student_id)
            .cloned()
            .collect();
        feedback.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(feedback)
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut t = self.tables.write().await;
        if task.student_id.is_none() && task.class_id.is_none() {
            return Err(conflict("task violates a data constraint"));
        }
        let dangling = !t.teacher_profiles.contains_key(&task.teacher_id)
            || task
                .student_id
                .is_some_and(|id| !t.student_profiles.contains_key(&id))
            || task.class_id.is_some_and(|id| !t.classes.contains_key(&id));
        if dangling {
            return Err(conflict("task references a missing row"));
        }
        let now = Utc::now();
        let saved = Task {
            id: TaskId::new(),
            teacher_id: task.teacher_id,
            student_id: task.student_id,
            class_id: task.class_id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        t.tasks.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update_task(&self, task: &Task) -> StoreResult<Task> {
        let mut t = self.tables.write().await;
        let row = t.tasks.get_mut(&task.id).ok_or_else(|| missing("task"))?;
        *row = Task {
            teacher_id: row.teacher_id,
            created_at: row.created_at,
            updated_at: Utc::now(),
            ..task.clone()
        };
        Ok(row.clone())
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.tables.write().await.tasks.remove(&id);
        Ok(())
    }

    async fn list_tasks_by_teacher(&self, teacher_id: TeacherProfileId) -> StoreResult<Vec<Task>> {
        let t = self.tables.read().await;
        let mut tasks: Vec<Task> = t
            .tasks
            .values()
            .filter(|task| task.teacher_id == teacher_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.due_date.is_none(), task.due_date, task.created_at));
        Ok(tasks)
    }

    async fn list_tasks_for_student(
        &self,
        student_id: StudentProfileId,
        class_id: ClassId,
    ) -> StoreResult<Vec<Task>> {
        let t = self.tables.read().await;
        let mut tasks: Vec<Task> = t
            .tasks
            .values()
            .filter(|task| match task.student_id {
                Some(id) => id == student_id,
                None => task.class_id == Some(class_id),
            })
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.due_date.is_none(), task.due_date, task.created_at));
        Ok(tasks)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
