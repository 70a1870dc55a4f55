use schoolhub_access::{Caller, Chain, MutationGuard, Operation, OwnershipResolver};
use schoolhub_core::{AppError, hash_password};
use schoolhub_db::Store;
use schoolhub_models::{
    CreateSchoolDto, CreateUserDto, NewUser, Role, School, SchoolId, UpdateSchoolDto, User,
};
use tracing::{info, instrument};

use crate::metrics;
use crate::utils::enforce;

pub struct SchoolService;

impl SchoolService {
    #[instrument(skip(store, caller, dto), fields(school.name = %dto.name))]
    pub async fn create_school(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateSchoolDto,
    ) -> Result<School, AppError> {
        enforce(Operation::CreateSchool, caller, &Chain::unscoped())?;

        let school = store.insert_school(dto.name, dto.address).await?;
        metrics::track_school_created();
        info!(school.id = %school.id, "School created");
        Ok(school)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_schools(store: &dyn Store, caller: &Caller) -> Result<Vec<School>, AppError> {
        enforce(Operation::ListSchools, caller, &Chain::unscoped())?;
        Ok(store.list_schools().await?)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_school(
        store: &dyn Store,
        caller: &Caller,
        id: SchoolId,
    ) -> Result<School, AppError> {
        let school = OwnershipResolver::new(store).school(id).await?;
        enforce(Operation::ViewSchool, caller, &school.chain)?;
        Ok(school.record)
    }

    #[instrument(skip(store, caller, dto))]
    pub async fn update_school(
        store: &dyn Store,
        caller: &Caller,
        id: SchoolId,
        dto: UpdateSchoolDto,
    ) -> Result<School, AppError> {
        let resolved = OwnershipResolver::new(store).school(id).await?;
        enforce(Operation::UpdateSchool, caller, &resolved.chain)?;

        let mut school = resolved.record;
        if let Some(name) = dto.name {
            school.name = name;
        }
        if let Some(address) = dto.address {
            school.address = Some(address);
        }
        let school = store.update_school(&school).await?;
        info!(school.id = %school.id, "School updated");
        Ok(school)
    }

    #[instrument(skip(store, caller))]
    pub async fn delete_school(
        store: &dyn Store,
        caller: &Caller,
        id: SchoolId,
    ) -> Result<(), AppError> {
        let school = OwnershipResolver::new(store).school(id).await?;
        enforce(Operation::DeleteSchool, caller, &school.chain)?;

        store.delete_school(id).await?;
        info!(school.id = %id, "School deleted");
        Ok(())
    }

    /// Creates an ADMIN account and makes it the school's principal.
    #[instrument(skip(store, caller, dto), fields(user.email = %dto.email))]
    pub async fn appoint_principal(
        store: &dyn Store,
        caller: &Caller,
        id: SchoolId,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        let school = OwnershipResolver::new(store).school(id).await?;
        enforce(Operation::AppointPrincipal, caller, &school.chain)?;

        MutationGuard::expect_role(dto.role, Role::Admin)?;
        MutationGuard::new(store).email_available(&dto.email).await?;

        let user = NewUser {
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            password_hash: hash_password(&dto.password)?,
            role: Role::Admin,
            school_id: Some(id),
        };
        let principal = store.appoint_principal(id, user).await?;

        metrics::track_user_created(Role::Admin.as_str());
        info!(school.id = %id, user.id = %principal.id, "Principal appointed");
        Ok(principal)
    }
}
