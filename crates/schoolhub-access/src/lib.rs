//! # SchoolHub Access
//!
//! The authorization core. Every access-controlled request flows through
//! the same four steps:
//!
//! 1. [`IdentityContext`] resolves the authenticated user into a [`Caller`]
//! 2. [`OwnershipResolver`] loads the target record and its [`Chain`]
//!    (school, class, class teacher, enrolled students, active teachers),
//!    failing with `NotFound` first
//! 3. [`authorize`] evaluates the decision table for the [`Operation`]
//! 4. on writes, [`MutationGuard`] checks cross-entity invariants
//!
//! Errors are typed as [`AccessError`] and convert into `AppError`.

pub mod caller;
pub mod chain;
pub mod error;
pub mod guard;
pub mod policy;

pub use caller::{Caller, IdentityContext};
pub use chain::{AssignmentLink, Chain, ClassLink, OwnershipResolver, Resolved};
pub use error::{AccessError, AccessResult};
pub use guard::MutationGuard;
pub use policy::{Clause, Decision, Operation, authorize, grants};
