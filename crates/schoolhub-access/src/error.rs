use schoolhub_core::AppError;
use schoolhub_db::StoreError;
use schoolhub_models::{Role, UserId};
use thiserror::Error;
use tracing::error;

/// Failure of an access-controlled operation.
///
/// Every check raises at the point of detection. The HTTP layer maps the
/// variants through the `From<AccessError> for AppError` impl below.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The referenced entity does not exist. Raised before any permission
    /// check runs.
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidArgument(String),
    /// A TEACHER or STUDENT user without its profile row.
    #[error("{role} user {user_id} has no profile")]
    ProfileMissing { user_id: UserId, role: Role },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound(entity) => {
                AppError::not_found(anyhow::anyhow!("{} not found", entity))
            }
            AccessError::Forbidden(reason) => AppError::forbidden(reason),
            AccessError::InvalidArgument(reason) => AppError::bad_request(anyhow::Error::msg(reason)),
            AccessError::ProfileMissing { user_id, role } => {
                error!(%user_id, %role, "Authenticated user has no profile record");
                AppError::forbidden("Access denied")
            }
            AccessError::Store(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AccessError::not_found("Class"), 404),
            (AccessError::forbidden("no"), 403),
            (AccessError::invalid("bad"), 400),
            (
                AccessError::ProfileMissing {
                    user_id: UserId::new(),
                    role: Role::Teacher,
                },
                403,
            ),
            (
                AccessError::Store(StoreError::Conflict("user already exists".into())),
                400,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status.as_u16(), status);
        }
    }

    #[test]
    fn test_profile_missing_hides_details() {
        let err = AppError::from(AccessError::ProfileMissing {
            user_id: UserId::new(),
            role: Role::Student,
        });
        assert_eq!(err.error.to_string(), "Access denied");
    }
}
