//! Identity Context: who is calling.

use crate::error::{AccessError, AccessResult};
use schoolhub_db::Store;
use schoolhub_models::{
    CallerSummary, ClassId, Role, SchoolId, StudentProfileId, TeacherProfileId, User, UserId,
};
use tracing::{debug, error};

/// The acting user, one variant per role.
///
/// Teacher and student variants carry their profile, resolved when the
/// caller is built, so every policy clause can be answered without another
/// lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    SuperAdmin {
        user_id: UserId,
    },
    /// A school administrator. `school_id` is `None` for an admin that has
    /// not been attached to a school; such a caller is denied everything.
    Principal {
        user_id: UserId,
        school_id: Option<SchoolId>,
    },
    Teacher {
        user_id: UserId,
        school_id: SchoolId,
        profile_id: TeacherProfileId,
    },
    Student {
        user_id: UserId,
        school_id: SchoolId,
        profile_id: StudentProfileId,
        class_id: ClassId,
    },
    Parent {
        user_id: UserId,
        school_id: SchoolId,
    },
}

impl Caller {
    pub fn user_id(&self) -> UserId {
        match self {
            Caller::SuperAdmin { user_id }
            | Caller::Principal { user_id, .. }
            | Caller::Teacher { user_id, .. }
            | Caller::Student { user_id, .. }
            | Caller::Parent { user_id, .. } => *user_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Caller::SuperAdmin { .. } => Role::SuperAdmin,
            Caller::Principal { .. } => Role::Admin,
            Caller::Teacher { .. } => Role::Teacher,
            Caller::Student { .. } => Role::Student,
            Caller::Parent { .. } => Role::Parent,
        }
    }

    pub fn school_id(&self) -> Option<SchoolId> {
        match self {
            Caller::SuperAdmin { .. } => None,
            Caller::Principal { school_id, .. } => *school_id,
            Caller::Teacher { school_id, .. }
            | Caller::Student { school_id, .. }
            | Caller::Parent { school_id, .. } => Some(*school_id),
        }
    }

    pub fn teacher_profile(&self) -> Option<TeacherProfileId> {
        match self {
            Caller::Teacher { profile_id, .. } => Some(*profile_id),
            _ => None,
        }
    }

    pub fn student_profile(&self) -> Option<StudentProfileId> {
        match self {
            Caller::Student { profile_id, .. } => Some(*profile_id),
            _ => None,
        }
    }

    pub fn summary(&self) -> CallerSummary {
        CallerSummary {
            user_id: self.user_id(),
            role: self.role(),
            school_id: self.school_id(),
            teacher_profile_id: self.teacher_profile(),
            student_profile_id: self.student_profile(),
            class_id: match self {
                Caller::Student { class_id, .. } => Some(*class_id),
                _ => None,
            },
        }
    }
}

/// Resolves an authenticated identity into a [`Caller`].
pub struct IdentityContext<'a> {
    store: &'a dyn Store,
}

impl<'a> IdentityContext<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Resolves the caller from the identity source's stable key (email).
    pub async fn resolve_by_email(&self, email: &str) -> AccessResult<Caller> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AccessError::not_found("User"))?;
        self.caller_for(user).await
    }

    async fn caller_for(&self, user: User) -> AccessResult<Caller> {
        if !user.enabled {
            debug!(user_id = %user.id, "Disabled user presented a valid token");
            return Err(AccessError::not_found("User"));
        }

        let user_id = user.id;
        let school = || {
            user.school_id.ok_or_else(|| {
                error!(%user_id, role = %user.role, "School-scoped user has no school");
                AccessError::forbidden("Access denied")
            })
        };

        let caller = match user.role {
            Role::SuperAdmin => Caller::SuperAdmin { user_id },
            Role::Admin => Caller::Principal {
                user_id,
                school_id: user.school_id,
            },
            Role::Teacher => {
                let profile = self
                    .store
                    .find_teacher_profile_by_user(user_id)
                    .await?
                    .ok_or(AccessError::ProfileMissing {
                        user_id,
                        role: Role::Teacher,
                    })?;
                Caller::Teacher {
                    user_id,
                    school_id: school()?,
                    profile_id: profile.id,
                }
            }
            Role::Student => {
                let profile = self
                    .store
                    .find_student_profile_by_user(user_id)
                    .await?
                    .ok_or(AccessError::ProfileMissing {
                        user_id,
                        role: Role::Student,
                    })?;
                Caller::Student {
                    user_id,
                    school_id: school()?,
                    profile_id: profile.id,
                    class_id: profile.class_id,
                }
            }
            Role::Parent => Caller::Parent {
                user_id,
                school_id: school()?,
            },
        };
        Ok(caller)
    }
}
