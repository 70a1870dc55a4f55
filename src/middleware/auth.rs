use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use schoolhub_access::{Caller, IdentityContext};
use schoolhub_auth::{Claims, verify_token};
use schoolhub_core::AppError;
use schoolhub_models::UserId;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID from the token subject
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    /// Get the user's email
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// The authenticated caller, resolved through the identity context.
///
/// Runs after [`AuthUser`]: the token's email is looked up again on every
/// request so disabled accounts and missing profiles are caught even while
/// their tokens are still valid.
#[derive(Debug, Clone)]
pub struct CurrentCaller(pub Caller);

impl FromRequestParts<AppState> for CurrentCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let token_user = auth_user.user_id()?;

        let caller = IdentityContext::new(state.store.as_ref())
            .resolve_by_email(auth_user.email())
            .await?;

        // The email now belongs to a different account than the one the
        // token was issued for.
        if caller.user_id() != token_user {
            return Err(AppError::unauthorized("Invalid or expired token"));
        }

        Ok(CurrentCaller(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(sub: String) -> Claims {
        Claims {
            sub,
            email: "test@example.com".to_string(),
            role: "TEACHER".to_string(),
            school_id: None,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id() {
        let user_id = Uuid::new_v4();
        let auth_user = AuthUser(claims(user_id.to_string()));
        assert_eq!(auth_user.user_id().unwrap(), UserId::from(user_id));
        assert_eq!(auth_user.email(), "test@example.com");
    }

    #[test]
    fn test_malformed_subject_is_unauthorized() {
        let auth_user = AuthUser(claims("not-a-uuid".to_string()));
        let err = auth_user.user_id().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }
}
