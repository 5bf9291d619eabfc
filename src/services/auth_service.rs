//! Domain service for authentication and user management.
//!
//! Stateless between calls: the caller keeps track of who is logged in and
//! decides which operations that session may perform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{User, UserStoreError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Username already exists")]
    DuplicateKey(String),

    #[error("User not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Store(String),
}

impl From<UserStoreError> for AuthError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::DuplicateKey(name) => Self::DuplicateKey(name),
            UserStoreError::NotFound(name) => Self::NotFound(name),
            UserStoreError::Forbidden(_) => Self::Forbidden("Cannot delete admin user".to_string()),
            UserStoreError::Database(e) => Self::Store(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(err.to_string())
    }
}

/// Result of a credential check. A failed check carries no hint about why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthResult {
    pub authenticated: bool,
    pub is_admin: bool,
    pub is_superadmin: bool,
}

impl AuthResult {
    #[must_use]
    pub const fn denied() -> Self {
        Self {
            authenticated: false,
            is_admin: false,
            is_superadmin: false,
        }
    }
}

/// Public view of a user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub is_admin: bool,
    pub is_superadmin: bool,
}

impl UserSummary {
    /// Display label; superadmin wins over admin.
    #[must_use]
    pub const fn role(&self) -> &'static str {
        if self.is_superadmin {
            "Super Admin"
        } else if self.is_admin {
            "Admin"
        } else {
            "Regular User"
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            is_admin: user.is_admin,
            is_superadmin: user.is_superadmin,
        }
    }
}

/// Input for [`AuthService::create_user`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_superadmin: bool,
}

/// The `(success, message)` pair handed to whoever triggered an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn from_result<T>(result: &Result<T, AuthError>, success_message: &str) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                message: success_message.to_string(),
            },
            Err(err) => Self {
                success: false,
                message: err.to_string(),
            },
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Checks a username/password pair. Never errors: unknown users, wrong
    /// passwords, unreadable hashes and store failures all yield
    /// [`AuthResult::denied`].
    async fn authenticate(&self, username: &str, password: &str) -> AuthResult;

    /// Creates a user with the given role flags.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidInput`] if username or password is empty,
    /// [`AuthError::DuplicateKey`] if the username is taken.
    async fn create_user(&self, input: CreateUser) -> Result<(), AuthError>;

    /// Removes a user.
    ///
    /// # Errors
    ///
    /// [`AuthError::Forbidden`] for the bootstrap account,
    /// [`AuthError::NotFound`] if no such user exists.
    async fn delete_user(&self, username: &str) -> Result<(), AuthError>;

    /// Like [`AuthService::delete_user`], but also refuses to let `actor`
    /// delete their own account.
    async fn delete_user_as(&self, actor: &str, username: &str) -> Result<(), AuthError>;

    /// Re-hashes and stores a new password.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidInput`] if the new password is empty,
    /// [`AuthError::NotFound`] if no such user exists.
    async fn update_password(&self, username: &str, new_password: &str) -> Result<(), AuthError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError>;

    async fn get_user(&self, username: &str) -> Result<User, AuthError>;
}
