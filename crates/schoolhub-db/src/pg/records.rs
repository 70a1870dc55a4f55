use super::{PgStore, missing, write_error};
use crate::store::{RecordStore, StoreResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use schoolhub_models::{
    Attendance, AttendanceId, ClassId, Feedback, FeedbackId, Mark, MarkId, NewAttendance, NewMark,
    NewTask, StudentProfileId, SubjectAssignmentId, Task, TaskId, TeacherProfileId,
};

const UPSERT_ATTENDANCE: &str = r#"
    INSERT INTO attendance
        (id, student_id, class_id, recorded_by, attendance_date, status, remarks)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (student_id, attendance_date) DO UPDATE
    SET class_id = EXCLUDED.class_id,
        recorded_by = EXCLUDED.recorded_by,
        status = EXCLUDED.status,
        remarks = EXCLUDED.remarks,
        updated_at = NOW()
    RETURNING *
"#;

#[async_trait]
impl RecordStore for PgStore {
    async fn find_attendance(&self, id: AttendanceId) -> StoreResult<Option<Attendance>> {
        let row = sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert_attendance(&self, rows: Vec<NewAttendance>) -> StoreResult<Vec<Attendance>> {
        let mut tx = self.pool.begin().await?;
        let mut written = Vec::with_capacity(rows.len());
        for row in rows {
            let saved = sqlx::query_as::<_, Attendance>(UPSERT_ATTENDANCE)
                .bind(AttendanceId::new())
                .bind(row.student_id)
                .bind(row.class_id)
                .bind(row.recorded_by)
                .bind(row.attendance_date)
                .bind(row.status)
                .bind(row.remarks)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| write_error(e, "attendance"))?;
            written.push(saved);
        }
        tx.commit().await?;
        Ok(written)
    }

    async fn list_class_attendance(
        &self,
        class_id: ClassId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendance
            WHERE class_id = $1 AND attendance_date BETWEEN $2 AND $3
            ORDER BY attendance_date, student_id
            "#,
        )
        .bind(class_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_student_attendance(
        &self,
        student_id: StudentProfileId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendance
            WHERE student_id = $1 AND attendance_date BETWEEN $2 AND $3
            ORDER BY attendance_date
            "#,
        )
        .bind(student_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_mark(&self, id: MarkId) -> StoreResult<Option<Mark>> {
        let mark = sqlx::query_as::<_, Mark>("SELECT * FROM marks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(mark)
    }

    async fn insert_mark(&self, mark: NewMark) -> StoreResult<Mark> {
        sqlx::query_as::<_, Mark>(
            r#"
            INSERT INTO marks (id, student_id, assignment_id, recorded_by, assessment_type,
                               score, max_score, remarks, assessed_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(MarkId::new())
        .bind(mark.student_id)
        .bind(mark.assignment_id)
        .bind(mark.recorded_by)
        .bind(mark.assessment_type)
        .bind(mark.score)
        .bind(mark.max_score)
        .bind(mark.remarks)
        .bind(mark.assessed_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "mark"))
    }

    async fn update_mark(&self, mark: &Mark) -> StoreResult<Mark> {
        sqlx::query_as::<_, Mark>(
            r#"
            UPDATE marks
            SET assessment_type = $2, score = $3, max_score = $4, remarks = $5,
                assessed_on = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(mark.id)
        .bind(&mark.assessment_type)
        .bind(mark.score)
        .bind(mark.max_score)
        .bind(&mark.remarks)
        .bind(mark.assessed_on)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "mark"))?
        .ok_or_else(|| missing("mark"))
    }

    async fn delete_mark(&self, id: MarkId) -> StoreResult<()> {
        sqlx::query("DELETE FROM marks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_marks_by_student(&self, student_id: StudentProfileId) -> StoreResult<Vec<Mark>> {
        let marks = sqlx::query_as::<_, Mark>(
            "SELECT * FROM marks WHERE student_id = $1 ORDER BY assessed_on",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(marks)
    }

    async fn list_marks_by_assignment(
        &self,
        assignment_id: SubjectAssignmentId,
    ) -> StoreResult<Vec<Mark>> {
        let marks = sqlx::query_as::<_, Mark>(
            "SELECT * FROM marks WHERE assignment_id = $1 ORDER BY assessed_on",
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(marks)
    }

    async fn find_feedback(&self, id: FeedbackId) -> StoreResult<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(feedback)
    }

    async fn insert_feedback(
        &self,
        student_id: StudentProfileId,
        assignment_id: SubjectAssignmentId,
        content: String,
    ) -> StoreResult<Feedback> {
        sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (id, student_id, assignment_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(FeedbackId::new())
        .bind(student_id)
        .bind(assignment_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "feedback"))
    }

    async fn mark_feedback_read(&self, id: FeedbackId) -> StoreResult<Feedback> {
        sqlx::query_as::<_, Feedback>(
            "UPDATE feedback SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| missing("feedback"))
    }

    async fn list_feedback_by_student(
        &self,
        student_id: StudentProfileId,
    ) -> StoreResult<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(feedback)
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, teacher_id, student_id, class_id, title, description, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(TaskId::new())
        .bind(task.teacher_id)
        .bind(task.student_id)
        .bind(task.class_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "task"))
    }

    async fn update_task(&self, task: &Task) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET student_id = $2, class_id = $3, title = $4, description = $5,
                due_date = $6, status = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(task.id)
        .bind(task.student_id)
        .bind(task.class_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "task"))?
        .ok_or_else(|| missing("task"))
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_tasks_by_teacher(&self, teacher_id: TeacherProfileId) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE teacher_id = $1 ORDER BY due_date NULLS LAST, created_at",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn list_tasks_for_student(
        &self,
        student_id: StudentProfileId,
        class_id: ClassId,
    ) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE student_id = $1 OR (student_id IS NULL AND class_id = $2)
            ORDER BY due_date NULLS LAST, created_at
            "#,
        )
        .bind(student_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }
}
