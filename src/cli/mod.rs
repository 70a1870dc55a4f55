//! Administrative commands backing the `schoolhub-cli` binary.
//!
//! Super admins cannot be created over HTTP; this is the only way in.

pub mod seeder;

use anyhow::{Context, bail};
use schoolhub_core::password::hash_password;
use schoolhub_db::Store;
use schoolhub_models::{NewUser, Role, User};
use tracing::info;

pub async fn create_super_admin(
    store: &dyn Store,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<User> {
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }
    if store
        .email_exists(email)
        .await
        .context("Failed to check email")?
    {
        bail!("User with this email already exists");
    }

    let password_hash = hash_password(password).map_err(|e| e.error)?;
    let user = store
        .insert_user(NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::SuperAdmin,
            school_id: None,
        })
        .await
        .context("Failed to insert super admin")?;

    info!(user.id = %user.id, "Super admin created");
    Ok(user)
}
