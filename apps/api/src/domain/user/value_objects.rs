use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Must contain a single '@' with text on both sides
/// - Stored lowercased and trimmed
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use civictrack_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" Clerk@City.gov ").expect("valid email");
    /// assert_eq!(email.as_str(), "clerk@city.gov");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into().trim().to_lowercase();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        }
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account role; decides which routes a token may reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Officer,
    Citizen,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Officer => write!(f, "officer"),
            Role::Citizen => write!(f, "citizen"),
        }
    }
}

/// The authenticated caller of a service operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: uuid::Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: uuid::Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True when the actor is the citizen with the given id
    pub fn is_citizen(&self, citizen_id: uuid::Uuid) -> bool {
        self.role == Role::Citizen && self.user_id == citizen_id
    }

    /// True when the actor is the officer with the given id
    pub fn is_officer(&self, officer_id: uuid::Uuid) -> bool {
        self.role == Role::Officer && self.user_id == officer_id
    }
}
