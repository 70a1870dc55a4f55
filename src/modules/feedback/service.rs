use schoolhub_access::{Caller, MutationGuard, Operation, OwnershipResolver, authorize};
use schoolhub_core::AppError;
use schoolhub_db::Store;
use schoolhub_models::{Feedback, FeedbackId, StudentProfileId, SubmitFeedbackDto};
use tracing::{info, instrument};

use crate::utils::enforce;

pub struct FeedbackService;

impl FeedbackService {
    #[instrument(skip(store, caller, dto), fields(student.id = %dto.student_id, assignment.id = %dto.assignment_id))]
    pub async fn submit_feedback(
        store: &dyn Store,
        caller: &Caller,
        dto: SubmitFeedbackDto,
    ) -> Result<Feedback, AppError> {
        let resolved = OwnershipResolver::new(store)
            .student_under_assignment(dto.student_id, dto.assignment_id)
            .await?;
        enforce(Operation::SubmitFeedback, caller, &resolved.chain)?;

        let (student, assignment) = &resolved.record;
        MutationGuard::student_in_class(student, assignment.class_id)?;

        let feedback = store
            .insert_feedback(dto.student_id, dto.assignment_id, dto.content)
            .await?;
        info!(feedback.id = %feedback.id, "Feedback submitted");
        Ok(feedback)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_feedback(
        store: &dyn Store,
        caller: &Caller,
        id: FeedbackId,
    ) -> Result<Feedback, AppError> {
        let feedback = OwnershipResolver::new(store).feedback(id).await?;
        enforce(Operation::ViewFeedback, caller, &feedback.chain)?;
        Ok(feedback.record)
    }

    /// Only the class teacher of the feedback's student may acknowledge it,
    /// so the check runs against the student's current class.
    #[instrument(skip(store, caller))]
    pub async fn mark_read(
        store: &dyn Store,
        caller: &Caller,
        id: FeedbackId,
    ) -> Result<Feedback, AppError> {
        let resolver = OwnershipResolver::new(store);
        let feedback = resolver.feedback(id).await?;
        let student = resolver.student(feedback.record.student_id).await?;
        enforce(Operation::MarkFeedbackRead, caller, &student.chain)?;

        let feedback = store.mark_feedback_read(id).await?;
        info!(feedback.id = %feedback.id, "Feedback marked as read");
        Ok(feedback)
    }

    /// Feedback on a student, narrowed to the entries the caller may see
    /// individually.
    #[instrument(skip(store, caller))]
    pub async fn list_by_student(
        store: &dyn Store,
        caller: &Caller,
        student_id: StudentProfileId,
    ) -> Result<Vec<Feedback>, AppError> {
        let resolver = OwnershipResolver::new(store);
        let student = resolver.student(student_id).await?;
        enforce(Operation::ViewStudentFeedback, caller, &student.chain)?;

        let mut visible = Vec::new();
        for feedback in store.list_feedback_by_student(student_id).await? {
            let chain = resolver.feedback_chain(&feedback).await?;
            if authorize(Operation::ViewFeedback, caller, &chain).is_allowed() {
                visible.push(feedback);
            }
        }
        Ok(visible)
    }
}
