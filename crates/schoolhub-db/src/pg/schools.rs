use super::users::insert_user_tx;
use super::{PgStore, missing, write_error};
use crate::store::{SchoolStore, StoreResult};
use async_trait::async_trait;
use schoolhub_models::{Class, ClassId, NewUser, School, SchoolId, User, UserId};

#[async_trait]
impl SchoolStore for PgStore {
    async fn find_school(&self, id: SchoolId) -> StoreResult<Option<School>> {
        let school = sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(school)
    }

    async fn list_schools(&self) -> StoreResult<Vec<School>> {
        let schools = sqlx::query_as::<_, School>("SELECT * FROM schools ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(schools)
    }

    async fn insert_school(&self, name: String, address: Option<String>) -> StoreResult<School> {
        sqlx::query_as::<_, School>(
            "INSERT INTO schools (id, name, address) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(SchoolId::new())
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "school"))
    }

    async fn update_school(&self, school: &School) -> StoreResult<School> {
        sqlx::query_as::<_, School>(
            r#"
            UPDATE schools SET name = $2, address = $3, principal_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(school.id)
        .bind(&school.name)
        .bind(&school.address)
        .bind(school.principal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "school"))?
        .ok_or_else(|| missing("school"))
    }

    async fn delete_school(&self, id: SchoolId) -> StoreResult<()> {
        sqlx::query("DELETE FROM schools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "school"))?;
        Ok(())
    }

    async fn appoint_principal(&self, school_id: SchoolId, user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        let principal = insert_user_tx(&mut tx, user).await?;
        let updated = sqlx::query(
            "UPDATE schools SET principal_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(school_id)
        .bind(principal.id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(missing("school"));
        }
        tx.commit().await?;
        Ok(principal)
    }

    async fn find_class(&self, id: ClassId) -> StoreResult<Option<Class>> {
        let class = sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(class)
    }

    async fn list_classes(&self, school_id: SchoolId) -> StoreResult<Vec<Class>> {
        let classes =
            sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE school_id = $1 ORDER BY name")
                .bind(school_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(classes)
    }

    async fn insert_class(
        &self,
        school_id: SchoolId,
        name: String,
        class_teacher_id: Option<UserId>,
    ) -> StoreResult<Class> {
        sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (id, school_id, name, class_teacher_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ClassId::new())
        .bind(school_id)
        .bind(name)
        .bind(class_teacher_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "class"))
    }

    async fn update_class(&self, class: &Class) -> StoreResult<Class> {
        sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes SET name = $2, class_teacher_id = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(class.id)
        .bind(&class.name)
        .bind(class.class_teacher_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "class"))?
        .ok_or_else(|| missing("class"))
    }

    async fn delete_class(&self, id: ClassId) -> StoreResult<()> {
        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, "class"))?;
        Ok(())
    }
}
