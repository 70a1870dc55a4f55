//! Shared helpers for the HTTP services.
//!
//! - [`authorize`]: authorization enforcement with logging and metrics

pub mod authorize;

pub use authorize::{enforce, scope_school};
