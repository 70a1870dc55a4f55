use schoolhub_access::{AccessError, Caller, MutationGuard, Operation, OwnershipResolver};
use schoolhub_core::AppError;
use schoolhub_db::Store;
use schoolhub_models::{
    ClassId, CreateSubjectAssignmentDto, Subject, SubjectAssignment, SubjectAssignmentId,
    SubjectId, UpdateSubjectAssignmentDto,
};
use tracing::{info, instrument};

use crate::utils::enforce;

pub struct SubjectAssignmentService;

impl SubjectAssignmentService {
    #[instrument(skip(store, caller, dto), fields(class.id = %dto.class_id, teacher.id = %dto.teacher_id))]
    pub async fn create_assignment(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateSubjectAssignmentDto,
    ) -> Result<SubjectAssignment, AppError> {
        let resolver = OwnershipResolver::new(store);
        let class = resolver.class(dto.class_id).await?;
        let subject = load_subject(store, dto.subject_id).await?;
        let teacher = resolver.teacher(dto.teacher_id).await?;
        enforce(Operation::CreateSubjectAssignment, caller, &class.chain)?;

        let school_id = class.record.school_id;
        let (_, teacher_user) = &teacher.record;
        MutationGuard::subject_in_school(&subject, school_id)?;
        MutationGuard::teacher_in_school(teacher_user, school_id)?;
        let key = dto.key();
        MutationGuard::new(store).assignment_unique(&key).await?;

        let assignment = store
            .insert_assignment(key, dto.status.unwrap_or_default())
            .await?;
        info!(assignment.id = %assignment.id, "Subject assignment created");
        Ok(assignment)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_assignment(
        store: &dyn Store,
        caller: &Caller,
        id: SubjectAssignmentId,
    ) -> Result<SubjectAssignment, AppError> {
        let assignment = OwnershipResolver::new(store).assignment(id).await?;
        enforce(Operation::ViewSubjectAssignment, caller, &assignment.chain)?;
        Ok(assignment.record)
    }

    /// Applies a partial update. Moving the assignment to another class also
    /// requires the right to manage the destination class.
    #[instrument(skip(store, caller, dto))]
    pub async fn update_assignment(
        store: &dyn Store,
        caller: &Caller,
        id: SubjectAssignmentId,
        dto: UpdateSubjectAssignmentDto,
    ) -> Result<SubjectAssignment, AppError> {
        let resolver = OwnershipResolver::new(store);
        let current = resolver.assignment(id).await?;

        let mut updated = current.record.clone();
        dto.apply(&mut updated);

        let target = resolver.class(updated.class_id).await?;
        let subject = load_subject(store, updated.subject_id).await?;
        let teacher = resolver.teacher(updated.teacher_id).await?;

        enforce(Operation::UpdateSubjectAssignment, caller, &current.chain)?;
        if updated.class_id != current.record.class_id {
            enforce(Operation::UpdateSubjectAssignment, caller, &target.chain)?;
        }

        let school_id = target.record.school_id;
        let (_, teacher_user) = &teacher.record;
        MutationGuard::subject_in_school(&subject, school_id)?;
        MutationGuard::teacher_in_school(teacher_user, school_id)?;
        if updated.key() != current.record.key() {
            MutationGuard::new(store)
                .assignment_unique(&updated.key())
                .await?;
        }

        let assignment = store.update_assignment(&updated).await?;
        info!(assignment.id = %assignment.id, status = ?assignment.status, "Subject assignment updated");
        Ok(assignment)
    }

    #[instrument(skip(store, caller))]
    pub async fn delete_assignment(
        store: &dyn Store,
        caller: &Caller,
        id: SubjectAssignmentId,
    ) -> Result<(), AppError> {
        let assignment = OwnershipResolver::new(store).assignment(id).await?;
        enforce(Operation::DeleteSubjectAssignment, caller, &assignment.chain)?;

        store.delete_assignment(id).await?;
        info!(assignment.id = %id, "Subject assignment deleted");
        Ok(())
    }

    #[instrument(skip(store, caller))]
    pub async fn list_by_class(
        store: &dyn Store,
        caller: &Caller,
        class_id: ClassId,
    ) -> Result<Vec<SubjectAssignment>, AppError> {
        let class = OwnershipResolver::new(store).class(class_id).await?;
        enforce(Operation::ViewClass, caller, &class.chain)?;
        Ok(store.list_assignments_by_class(class_id).await?)
    }
}

async fn load_subject(store: &dyn Store, id: SubjectId) -> Result<Subject, AccessError> {
    store
        .find_subject(id)
        .await?
        .ok_or_else(|| AccessError::not_found("Subject"))
}
