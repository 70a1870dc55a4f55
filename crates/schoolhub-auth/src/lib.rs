//! # SchoolHub Auth
//!
//! Authentication types and JWT utilities for the SchoolHub API.
//!
//! - [`claims`]: JWT claim structure for access tokens
//! - [`jwt`]: Token creation and verification
//!
//! Tokens only establish *who* the caller is. Everything the caller may do
//! is decided per request by `schoolhub-access`, never from token contents.
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_auth::{create_access_token, verify_token};
//! use schoolhub_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "teacher@school.test", "TEACHER", Some(school_id), &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
