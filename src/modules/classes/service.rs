use schoolhub_access::{AccessError, Caller, MutationGuard, Operation, OwnershipResolver};
use schoolhub_core::AppError;
use schoolhub_db::Store;
use schoolhub_models::{
    AssignClassTeacherDto, Class, ClassId, CreateClassDto, SchoolScopeQuery, StudentWithProfile,
    UpdateClassDto, User, UserId,
};
use tracing::{info, instrument};

use crate::utils::{enforce, scope_school};

pub struct ClassService;

impl ClassService {
    #[instrument(skip(store, caller, dto), fields(class.name = %dto.name))]
    pub async fn create_class(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateClassDto,
    ) -> Result<Class, AppError> {
        let school_id = scope_school(caller, dto.school_id)?;
        let school = OwnershipResolver::new(store).school(school_id).await?;
        let class_teacher = match dto.class_teacher_id {
            Some(id) => Some(load_teacher_user(store, id).await?),
            None => None,
        };
        enforce(Operation::CreateClass, caller, &school.chain)?;

        if let Some(teacher) = &class_teacher {
            MutationGuard::class_teacher_candidate(teacher, school_id)?;
        }

        let class = store
            .insert_class(school_id, dto.name, dto.class_teacher_id)
            .await?;
        info!(class.id = %class.id, school.id = %school_id, "Class created");
        Ok(class)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_classes(
        store: &dyn Store,
        caller: &Caller,
        query: SchoolScopeQuery,
    ) -> Result<Vec<Class>, AppError> {
        let school_id = scope_school(caller, query.school_id)?;
        let school = OwnershipResolver::new(store).school(school_id).await?;
        enforce(Operation::ListClasses, caller, &school.chain)?;
        Ok(store.list_classes(school_id).await?)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_class(
        store: &dyn Store,
        caller: &Caller,
        id: ClassId,
    ) -> Result<Class, AppError> {
        let class = OwnershipResolver::new(store).class(id).await?;
        enforce(Operation::ViewClass, caller, &class.chain)?;
        Ok(class.record)
    }

    #[instrument(skip(store, caller, dto))]
    pub async fn update_class(
        store: &dyn Store,
        caller: &Caller,
        id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let resolved = OwnershipResolver::new(store).class(id).await?;
        enforce(Operation::UpdateClass, caller, &resolved.chain)?;

        let mut class = resolved.record;
        if let Some(name) = dto.name {
            class.name = name;
        }
        let class = store.update_class(&class).await?;
        info!(class.id = %class.id, "Class updated");
        Ok(class)
    }

    #[instrument(skip(store, caller))]
    pub async fn delete_class(
        store: &dyn Store,
        caller: &Caller,
        id: ClassId,
    ) -> Result<(), AppError> {
        let class = OwnershipResolver::new(store).class(id).await?;
        enforce(Operation::DeleteClass, caller, &class.chain)?;

        store.delete_class(id).await?;
        info!(class.id = %id, "Class deleted");
        Ok(())
    }

    /// Sets or clears the designated class teacher.
    #[instrument(skip(store, caller, dto))]
    pub async fn assign_class_teacher(
        store: &dyn Store,
        caller: &Caller,
        id: ClassId,
        dto: AssignClassTeacherDto,
    ) -> Result<Class, AppError> {
        let resolved = OwnershipResolver::new(store).class(id).await?;
        let candidate = match dto.teacher_id {
            Some(teacher_id) => Some(load_teacher_user(store, teacher_id).await?),
            None => None,
        };
        enforce(Operation::UpdateClass, caller, &resolved.chain)?;

        let mut class = resolved.record;
        if let Some(teacher) = &candidate {
            MutationGuard::class_teacher_candidate(teacher, class.school_id)?;
        }
        class.class_teacher_id = dto.teacher_id;

        let class = store.update_class(&class).await?;
        info!(class.id = %class.id, teacher.id = ?class.class_teacher_id, "Class teacher changed");
        Ok(class)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_students(
        store: &dyn Store,
        caller: &Caller,
        id: ClassId,
    ) -> Result<Vec<StudentWithProfile>, AppError> {
        let class = OwnershipResolver::new(store).class(id).await?;
        enforce(Operation::ViewClass, caller, &class.chain)?;

        let profiles = store.list_students_in_class(id).await?;
        let mut students = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let user = store
                .find_user(profile.user_id)
                .await?
                .ok_or_else(|| AccessError::not_found("Student"))?;
            students.push(StudentWithProfile { user, profile });
        }
        Ok(students)
    }
}

async fn load_teacher_user(store: &dyn Store, id: UserId) -> Result<User, AccessError> {
    store
        .find_user(id)
        .await?
        .ok_or_else(|| AccessError::not_found("Teacher"))
}
