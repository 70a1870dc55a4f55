use schoolhub_access::{Caller, Operation, OwnershipResolver};
use schoolhub_core::AppError;
use schoolhub_db::Store;
use schoolhub_models::{CreateSubjectDto, SchoolScopeQuery, Subject};
use tracing::{info, instrument};

use crate::utils::{enforce, scope_school};

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(store, caller, dto), fields(subject.name = %dto.name))]
    pub async fn create_subject(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateSubjectDto,
    ) -> Result<Subject, AppError> {
        let school_id = scope_school(caller, dto.school_id)?;
        let school = OwnershipResolver::new(store).school(school_id).await?;
        enforce(Operation::CreateSubject, caller, &school.chain)?;

        let subject = store.insert_subject(school_id, dto.name, dto.code).await?;
        info!(subject.id = %subject.id, school.id = %school_id, "Subject created");
        Ok(subject)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_subjects(
        store: &dyn Store,
        caller: &Caller,
        query: SchoolScopeQuery,
    ) -> Result<Vec<Subject>, AppError> {
        let school_id = scope_school(caller, query.school_id)?;
        let school = OwnershipResolver::new(store).school(school_id).await?;
        enforce(Operation::ListSubjects, caller, &school.chain)?;
        Ok(store.list_subjects(school_id).await?)
    }
}
