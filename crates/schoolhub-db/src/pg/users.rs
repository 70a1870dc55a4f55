use super::{PgStore, missing, write_error};
use crate::store::{StoreResult, UserStore};
use async_trait::async_trait;
use schoolhub_models::{
    ClassId, NewUser, StudentProfile, StudentProfileId, TeacherProfile, TeacherProfileId, User,
    UserId,
};
use sqlx::{Postgres, Transaction};

const INSERT_USER: &str = r#"
    INSERT INTO users (id, first_name, last_name, email, password_hash, role, school_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING *
"#;

/// Inserts the user row inside an open transaction.
pub(super) async fn insert_user_tx(
    tx: &mut Transaction<'_, Postgres>,
    user: NewUser,
) -> StoreResult<User> {
    sqlx::query_as::<_, User>(INSERT_USER)
        .bind(UserId::new())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.school_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| write_error(e, "user"))
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        let user = insert_user_tx(&mut tx, user).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn insert_teacher(
        &self,
        user: NewUser,
        subjects: Vec<String>,
    ) -> StoreResult<(User, TeacherProfile)> {
        let mut tx = self.pool.begin().await?;
        let user = insert_user_tx(&mut tx, user).await?;
        let profile = sqlx::query_as::<_, TeacherProfile>(
            "INSERT INTO teacher_profiles (id, user_id, subjects) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(TeacherProfileId::new())
        .bind(user.id)
        .bind(&subjects)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "teacher profile"))?;
        tx.commit().await?;
        Ok((user, profile))
    }

    async fn insert_student(
        &self,
        user: NewUser,
        class_id: ClassId,
    ) -> StoreResult<(User, StudentProfile)> {
        let mut tx = self.pool.begin().await?;
        let user = insert_user_tx(&mut tx, user).await?;
        let profile = sqlx::query_as::<_, StudentProfile>(
            "INSERT INTO student_profiles (id, user_id, class_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(StudentProfileId::new())
        .bind(user.id)
        .bind(class_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "student profile"))?;
        tx.commit().await?;
        Ok((user, profile))
    }

    async fn find_teacher_profile(
        &self,
        id: TeacherProfileId,
    ) -> StoreResult<Option<TeacherProfile>> {
        let profile =
            sqlx::query_as::<_, TeacherProfile>("SELECT * FROM teacher_profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn find_teacher_profile_by_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<TeacherProfile>> {
        let profile = sqlx::query_as::<_, TeacherProfile>(
            "SELECT * FROM teacher_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn find_student_profile(
        &self,
        id: StudentProfileId,
    ) -> StoreResult<Option<StudentProfile>> {
        let profile =
            sqlx::query_as::<_, StudentProfile>("SELECT * FROM student_profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn find_student_profile_by_user(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<StudentProfile>> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            "SELECT * FROM student_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn list_students_in_class(&self, class_id: ClassId) -> StoreResult<Vec<StudentProfile>> {
        let profiles = sqlx::query_as::<_, StudentProfile>(
            "SELECT * FROM student_profiles WHERE class_id = $1",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }

    async fn update_student_class(
        &self,
        id: StudentProfileId,
        class_id: ClassId,
    ) -> StoreResult<StudentProfile> {
        sqlx::query_as::<_, StudentProfile>(
            "UPDATE student_profiles SET class_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "student profile"))?
        .ok_or_else(|| missing("student profile"))
    }
}
