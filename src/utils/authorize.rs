//! Glue between services and the access-control core.

use schoolhub_access::{AccessError, AccessResult, Caller, Chain, Operation, authorize};
use schoolhub_models::SchoolId;
use tracing::{debug, warn};

use crate::metrics;

/// Authorizes `operation` or raises `Forbidden`.
///
/// Every decision is counted; denials are logged with the operation and the
/// caller's role but never with the target record.
pub fn enforce(operation: Operation, caller: &Caller, chain: &Chain) -> AccessResult<()> {
    let decision = authorize(operation, caller, chain);
    let role = caller.role();
    metrics::track_authorization_check(operation.as_str(), role.as_str(), decision.is_allowed());

    if decision.is_allowed() {
        debug!(%operation, %role, user_id = %caller.user_id(), "Access granted");
    } else {
        warn!(%operation, %role, user_id = %caller.user_id(), "Access denied");
    }
    decision.into_result()
}

/// The school a school-scoped create or list targets.
///
/// Super admins must name the school; everyone else defaults to their own.
/// An explicit school outside the caller's own is left for the policy to
/// deny.
pub fn scope_school(caller: &Caller, requested: Option<SchoolId>) -> AccessResult<SchoolId> {
    if let Some(school_id) = requested {
        return Ok(school_id);
    }
    match caller {
        Caller::SuperAdmin { .. } => Err(AccessError::invalid(
            "Super admin must specify school_id for this operation",
        )),
        Caller::Principal {
            school_id: None, ..
        } => Err(AccessError::forbidden(
            "Principal is not associated with a school",
        )),
        _ => caller
            .school_id()
            .ok_or_else(|| AccessError::forbidden("Access denied")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_models::UserId;

    #[test]
    fn test_super_admin_must_name_school() {
        let caller = Caller::SuperAdmin {
            user_id: UserId::new(),
        };
        assert!(matches!(
            scope_school(&caller, None),
            Err(AccessError::InvalidArgument(_))
        ));
        let school = SchoolId::new();
        assert_eq!(scope_school(&caller, Some(school)).unwrap(), school);
    }

    #[test]
    fn test_principal_defaults_to_own_school() {
        let school = SchoolId::new();
        let caller = Caller::Principal {
            user_id: UserId::new(),
            school_id: Some(school),
        };
        assert_eq!(scope_school(&caller, None).unwrap(), school);

        let orphan = Caller::Principal {
            user_id: UserId::new(),
            school_id: None,
        };
        assert!(matches!(
            scope_school(&orphan, None),
            Err(AccessError::Forbidden(_))
        ));
    }

    #[test]
    fn test_enforce_maps_deny_to_forbidden() {
        let caller = Caller::Principal {
            user_id: UserId::new(),
            school_id: Some(SchoolId::new()),
        };
        let other = Chain::school(SchoolId::new());
        assert!(matches!(
            enforce(Operation::CreateClass, &caller, &other),
            Err(AccessError::Forbidden(_))
        ));
        assert!(enforce(Operation::CreateSchool, &caller, &Chain::unscoped()).is_err());
    }
}
