// First-run administrator account

use uuid::Uuid;

use crate::auth::password::{hash_password, is_acceptable};
use crate::domain::repositories::{User, UserRepository};
use crate::domain::user::{Email, Role};

/// Creates the administrator account when it does not exist yet
///
/// Returns `Ok(true)` when an account was created. An existing account with
/// the same email is left untouched, whatever its role.
pub async fn ensure_admin(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<bool, String> {
    let email = Email::new(email)?;
    if !is_acceptable(password) {
        return Err("ADMIN_PASSWORD is too short".to_string());
    }

    if let Some(existing) = users
        .find_by_email(&email)
        .await
        .map_err(|e| e.to_string())?
    {
        if existing.role != Role::Admin {
            tracing::warn!(email = %email, role = %existing.role, "Admin email belongs to a non-admin account");
        }
        return Ok(false);
    }

    let password_hash = hash_password(password)?;
    let id = users
        .create(User {
            id: Uuid::new_v4(),
            email: email.clone(),
            password_hash,
            full_name: "Administrator".to_string(),
            phone: None,
            role: Role::Admin,
            is_active: true,
        })
        .await
        .map_err(|e| e.to_string())?;

    tracing::info!(user_id = %id, email = %email, "Created administrator account");
    Ok(true)
}
