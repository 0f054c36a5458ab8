//! Identity models

use serde::{Deserialize, Serialize};

/// A registered storefront account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Display name
    pub username: String,
    /// Login email, unique per account
    pub email: String,
    /// Bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Administrative flag
    pub admin: bool,
    /// Whether the email address has been verified
    pub email_verified: bool,
    /// When the account was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Create a new user. Accounts start unverified and without privileges.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            admin: false,
            email_verified: false,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// The resolved identity of a request.
///
/// These two fields are the entire contract guarded routes rely on.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub admin: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            admin: user.admin,
        }
    }
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User information in responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub email_verified: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            admin: user.admin,
            email_verified: user.email_verified,
        }
    }
}
