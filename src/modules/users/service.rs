//! School membership: teachers, students and parents are created by the
//! principal of the school they join.

use schoolhub_access::{AccessError, Caller, Chain, MutationGuard, Operation, OwnershipResolver};
use schoolhub_core::{AppError, hash_password};
use schoolhub_db::Store;
use schoolhub_models::{
    CreateUserDto, NewUser, Role, SchoolId, StudentProfileId, StudentWithProfile,
    TeacherWithProfile, TransferStudentDto, User,
};
use tracing::{info, instrument};

use crate::metrics;
use crate::utils::enforce;

pub struct UserService;

impl UserService {
    #[instrument(skip(store, caller, dto), fields(user.email = %dto.email))]
    pub async fn create_teacher(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateUserDto,
    ) -> Result<TeacherWithProfile, AppError> {
        let school_id = authorize_enrolment(store, caller).await?;
        MutationGuard::expect_role(dto.role, Role::Teacher)?;
        MutationGuard::new(store).email_available(&dto.email).await?;

        let subjects = dto.subjects.clone();
        let (user, profile) = store
            .insert_teacher(new_member(dto, Role::Teacher, school_id)?, subjects)
            .await?;

        metrics::track_user_created(Role::Teacher.as_str());
        info!(user.id = %user.id, school.id = %school_id, "Teacher created");
        Ok(TeacherWithProfile { user, profile })
    }

    #[instrument(skip(store, caller, dto), fields(user.email = %dto.email))]
    pub async fn create_student(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateUserDto,
    ) -> Result<StudentWithProfile, AppError> {
        let class_id = dto
            .class_id
            .ok_or_else(|| AccessError::invalid("class_id is required for students"))?;
        let class = OwnershipResolver::new(store).class(class_id).await?;
        let school_id = authorize_enrolment(store, caller).await?;

        MutationGuard::expect_role(dto.role, Role::Student)?;
        MutationGuard::class_in_school(&class.record, school_id)?;
        MutationGuard::new(store).email_available(&dto.email).await?;

        let (user, profile) = store
            .insert_student(new_member(dto, Role::Student, school_id)?, class_id)
            .await?;

        metrics::track_user_created(Role::Student.as_str());
        info!(user.id = %user.id, class.id = %class_id, "Student enrolled");
        Ok(StudentWithProfile { user, profile })
    }

    #[instrument(skip(store, caller, dto), fields(user.email = %dto.email))]
    pub async fn create_parent(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        let school_id = authorize_enrolment(store, caller).await?;
        MutationGuard::expect_role(dto.role, Role::Parent)?;
        MutationGuard::new(store).email_available(&dto.email).await?;

        let user = store
            .insert_user(new_member(dto, Role::Parent, school_id)?)
            .await?;

        metrics::track_user_created(Role::Parent.as_str());
        info!(user.id = %user.id, school.id = %school_id, "Parent created");
        Ok(user)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_student(
        store: &dyn Store,
        caller: &Caller,
        id: StudentProfileId,
    ) -> Result<StudentWithProfile, AppError> {
        let student = OwnershipResolver::new(store).student(id).await?;
        enforce(Operation::ViewStudent, caller, &student.chain)?;

        let user = store
            .find_user(student.record.user_id)
            .await?
            .ok_or_else(|| AccessError::not_found("Student"))?;
        Ok(StudentWithProfile {
            user,
            profile: student.record,
        })
    }

    /// Moves a student to another class of the same school.
    #[instrument(skip(store, caller))]
    pub async fn transfer_student(
        store: &dyn Store,
        caller: &Caller,
        id: StudentProfileId,
        dto: TransferStudentDto,
    ) -> Result<StudentWithProfile, AppError> {
        let resolver = OwnershipResolver::new(store);
        let student = resolver.student(id).await?;
        let target = resolver.class(dto.class_id).await?;
        enforce(Operation::TransferStudent, caller, &student.chain)?;

        let school_id = student
            .chain
            .school_id
            .ok_or_else(|| AppError::forbidden("Access denied"))?;
        MutationGuard::class_in_school(&target.record, school_id)?;

        let profile = store.update_student_class(id, dto.class_id).await?;
        let user = store
            .find_user(profile.user_id)
            .await?
            .ok_or_else(|| AccessError::not_found("Student"))?;

        info!(student.id = %id, class.id = %profile.class_id, "Student transferred");
        Ok(StudentWithProfile { user, profile })
    }
}

/// Authorizes creating a member of the caller's own school and returns that
/// school.
async fn authorize_enrolment(store: &dyn Store, caller: &Caller) -> Result<SchoolId, AppError> {
    let chain = match caller.school_id() {
        Some(school_id) => OwnershipResolver::new(store).school(school_id).await?.chain,
        None => Chain::unscoped(),
    };
    enforce(Operation::EnrolMember, caller, &chain)?;
    chain
        .school_id
        .ok_or_else(|| AppError::forbidden("Access denied"))
}

/// The new user is always placed in the creating principal's school,
/// whatever the request says.
fn new_member(dto: CreateUserDto, role: Role, school_id: SchoolId) -> Result<NewUser, AppError> {
    Ok(NewUser {
        password_hash: hash_password(&dto.password)?,
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
        role,
        school_id: Some(school_id),
    })
}
