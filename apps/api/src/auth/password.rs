// Password hashing with bcrypt

use bcrypt::{hash, verify, DEFAULT_COST};

pub const PASSWORD_MIN_LEN: usize = 8;

/// Hashes a password using bcrypt
///
/// # Example
/// ```
/// use civictrack_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, String> {
    hash(password, DEFAULT_COST).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

/// True when a password is long enough to accept at registration
pub fn is_acceptable(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LEN
}
