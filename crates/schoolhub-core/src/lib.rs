//! # SchoolHub Core
//!
//! Foundational types shared by every SchoolHub crate:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::errors::AppError;
//! use schoolhub_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Class not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, verify_password};
