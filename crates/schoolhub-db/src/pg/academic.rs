use super::{PgStore, missing, write_error};
use crate::store::{AcademicStore, StoreResult};
use async_trait::async_trait;
use schoolhub_models::{
    AssignmentKey, AssignmentStatus, ClassId, SchoolId, Subject, SubjectAssignment,
    SubjectAssignmentId, SubjectId, TeacherProfileId,
};

#[async_trait]
impl AcademicStore for PgStore {
    async fn find_subject(&self, id: SubjectId) -> StoreResult<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(subject)
    }

    async fn list_subjects(&self, school_id: SchoolId) -> StoreResult<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT * FROM subjects WHERE school_id = $1 ORDER BY name",
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    async fn insert_subject(
        &self,
        school_id: SchoolId,
        name: String,
        code: Option<String>,
    ) -> StoreResult<Subject> {
        sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (id, school_id, name, code) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(SubjectId::new())
        .bind(school_id)
        .bind(name)
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "subject"))
    }

    async fn find_assignment(
        &self,
        id: SubjectAssignmentId,
    ) -> StoreResult<Option<SubjectAssignment>> {
        let assignment = sqlx::query_as::<_, SubjectAssignment>(
            "SELECT * FROM subject_assignments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(assignment)
    }

    async fn list_assignments_by_class(
        &self,
        class_id: ClassId,
    ) -> StoreResult<Vec<SubjectAssignment>> {
        let assignments = sqlx::query_as::<_, SubjectAssignment>(
            "SELECT * FROM subject_assignments WHERE class_id = $1 ORDER BY academic_year, term",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    async fn insert_assignment(
        &self,
        key: AssignmentKey,
        status: AssignmentStatus,
    ) -> StoreResult<SubjectAssignment> {
        sqlx::query_as::<_, SubjectAssignment>(
            r#"
            INSERT INTO subject_assignments
                (id, class_id, subject_id, teacher_id, academic_year, term, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(SubjectAssignmentId::new())
        .bind(key.class_id)
        .bind(key.subject_id)
        .bind(key.teacher_id)
        .bind(key.academic_year)
        .bind(key.term)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "subject assignment"))
    }

    async fn update_assignment(
        &self,
        assignment: &SubjectAssignment,
    ) -> StoreResult<SubjectAssignment> {
        sqlx::query_as::<_, SubjectAssignment>(
            r#"
            UPDATE subject_assignments
            SET class_id = $2, subject_id = $3, teacher_id = $4,
                academic_year = $5, term = $6, status = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.class_id)
        .bind(assignment.subject_id)
        .bind(assignment.teacher_id)
        .bind(&assignment.academic_year)
        .bind(&assignment.term)
        .bind(assignment.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "subject assignment"))?
        .ok_or_else(|| missing("subject assignment"))
    }

    async fn delete_assignment(&self, id: SubjectAssignmentId) -> StoreResult<()> {
        sqlx::query("DELETE FROM subject_assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "subject assignment"))?;
        Ok(())
    }

    async fn assignment_exists(&self, key: &AssignmentKey) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subject_assignments
                WHERE class_id = $1 AND subject_id = $2 AND teacher_id = $3
                  AND academic_year = $4 AND term = $5
            )
            "#,
        )
        .bind(key.class_id)
        .bind(key.subject_id)
        .bind(key.teacher_id)
        .bind(&key.academic_year)
        .bind(&key.term)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn active_teacher_ids(&self, class_id: ClassId) -> StoreResult<Vec<TeacherProfileId>> {
        let ids: Vec<TeacherProfileId> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT teacher_id FROM subject_assignments
            WHERE class_id = $1 AND status = $2
            "#,
        )
        .bind(class_id)
        .bind(AssignmentStatus::Active)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
