use schoolhub_access::{Caller, MutationGuard, Operation, OwnershipResolver};
use schoolhub_core::AppError;
use schoolhub_db::Store;
use schoolhub_models::{
    CreateMarkDto, Mark, MarkId, NewMark, StudentProfileId, SubjectAssignmentId, UpdateMarkDto,
};
use tracing::{info, instrument};

use crate::utils::enforce;

pub struct MarkService;

impl MarkService {
    #[instrument(skip(store, caller, dto), fields(student.id = %dto.student_id, assignment.id = %dto.assignment_id))]
    pub async fn create_mark(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateMarkDto,
    ) -> Result<Mark, AppError> {
        let resolved = OwnershipResolver::new(store)
            .student_under_assignment(dto.student_id, dto.assignment_id)
            .await?;
        enforce(Operation::EnterMark, caller, &resolved.chain)?;

        let (student, assignment) = &resolved.record;
        MutationGuard::student_in_class(student, assignment.class_id)?;
        MutationGuard::score_in_range(dto.score, dto.max_score)?;

        let mark = store
            .insert_mark(NewMark {
                student_id: dto.student_id,
                assignment_id: dto.assignment_id,
                recorded_by: caller.teacher_profile(),
                assessment_type: dto.assessment_type,
                score: dto.score,
                max_score: dto.max_score,
                remarks: dto.remarks,
                assessed_on: dto.assessed_on,
            })
            .await?;
        info!(mark.id = %mark.id, "Mark entered");
        Ok(mark)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_mark(store: &dyn Store, caller: &Caller, id: MarkId) -> Result<Mark, AppError> {
        let mark = OwnershipResolver::new(store).mark(id).await?;
        enforce(Operation::ViewMark, caller, &mark.chain)?;
        Ok(mark.record)
    }

    #[instrument(skip(store, caller, dto))]
    pub async fn update_mark(
        store: &dyn Store,
        caller: &Caller,
        id: MarkId,
        dto: UpdateMarkDto,
    ) -> Result<Mark, AppError> {
        let resolved = OwnershipResolver::new(store).mark(id).await?;
        enforce(Operation::UpdateMark, caller, &resolved.chain)?;

        let mut mark = resolved.record;
        dto.apply(&mut mark);
        MutationGuard::score_in_range(mark.score, mark.max_score)?;

        let mark = store.update_mark(&mark).await?;
        info!(mark.id = %mark.id, "Mark updated");
        Ok(mark)
    }

    #[instrument(skip(store, caller))]
    pub async fn delete_mark(store: &dyn Store, caller: &Caller, id: MarkId) -> Result<(), AppError> {
        let mark = OwnershipResolver::new(store).mark(id).await?;
        enforce(Operation::DeleteMark, caller, &mark.chain)?;

        store.delete_mark(id).await?;
        info!(mark.id = %id, "Mark deleted");
        Ok(())
    }

    #[instrument(skip(store, caller))]
    pub async fn list_by_student(
        store: &dyn Store,
        caller: &Caller,
        student_id: StudentProfileId,
    ) -> Result<Vec<Mark>, AppError> {
        let student = OwnershipResolver::new(store).student(student_id).await?;
        enforce(Operation::ViewStudentMarks, caller, &student.chain)?;
        Ok(store.list_marks_by_student(student_id).await?)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_by_assignment(
        store: &dyn Store,
        caller: &Caller,
        assignment_id: SubjectAssignmentId,
    ) -> Result<Vec<Mark>, AppError> {
        let assignment = OwnershipResolver::new(store).assignment(assignment_id).await?;
        enforce(Operation::ViewAssignmentMarks, caller, &assignment.chain)?;
        Ok(store.list_marks_by_assignment(assignment_id).await?)
    }
}
