//! Access token claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Payload of a SchoolHub access token.
///
/// Only `sub` and `email` carry weight at request time: the caller is looked
/// up again by email on every request, so `role` and `school_id` describe the
/// account as it was when the token was issued and are never trusted for
/// authorization.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    /// e.g. `TEACHER`
    pub role: String,
    /// `None` for super admins.
    pub school_id: Option<Uuid>,
    /// Unix seconds.
    pub exp: usize,
    /// Unix seconds.
    pub iat: usize,
}
