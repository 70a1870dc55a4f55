//! Request extractors.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::AuthUser`] validates the JWT and extracts claims
//! 3. [`auth::CurrentCaller`] resolves the claims to a [`schoolhub_access::Caller`]
//! 4. The service authorizes the operation against the target's chain
//!
//! ```ignore
//! async fn get_class(
//!     State(state): State<AppState>,
//!     CurrentCaller(caller): CurrentCaller,
//!     Path(id): Path<ClassId>,
//! ) -> Result<Json<Class>, AppError> {
//!     let class = ClassService::get_class(state.store.as_ref(), &caller, id).await?;
//!     Ok(Json(class))
//! }
//! ```

pub mod auth;
