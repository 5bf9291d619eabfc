//! `SeaORM` implementation of the `AuthService` trait.

use crate::constants::auth::BOOTSTRAP_USERNAME;
use crate::db::{NewUser, Store, User};
use crate::services::auth_service::{AuthError, AuthResult, AuthService, CreateUser, UserSummary};
use crate::services::password::PasswordHasher;
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    hasher: PasswordHasher,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    async fn check_credentials(&self, username: &str, password: &str) -> Option<User> {
        let (user, password_hash) = match self.store.get_user_with_password(username).await {
            Ok(Some(found)) => found,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Credential lookup failed");
                return None;
            }
        };

        match self.hasher.verify_blocking(password_hash, password).await {
            Ok(true) => Some(user),
            Ok(false) => None,
            Err(e) => {
                warn!(username = %username, error = %e, "Stored password hash could not be verified");
                None
            }
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, username: &str, password: &str) -> AuthResult {
        let Some(user) = self.check_credentials(username, password).await else {
            metrics::counter!("auth_login_attempts_total", "outcome" => "denied").increment(1);
            return AuthResult::denied();
        };

        metrics::counter!("auth_login_attempts_total", "outcome" => "success").increment(1);

        if let Err(e) = self.store.record_user_login(&user.username).await {
            warn!(username = %user.username, error = %e, "Failed to record login time");
        }

        AuthResult {
            authenticated: true,
            is_admin: user.is_admin,
            is_superadmin: user.is_superadmin,
        }
    }

    async fn create_user(&self, input: CreateUser) -> Result<(), AuthError> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(AuthError::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }

        let password_hash = self.hasher.hash_blocking(&input.password).await?;

        self.store
            .insert_user(NewUser {
                username: input.username.clone(),
                password_hash,
                is_admin: input.is_admin,
                is_superadmin: input.is_superadmin,
            })
            .await?;

        info!(
            username = %input.username,
            is_admin = input.is_admin,
            is_superadmin = input.is_superadmin,
            "User created"
        );
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), AuthError> {
        if username == BOOTSTRAP_USERNAME {
            return Err(AuthError::Forbidden("Cannot delete admin user".to_string()));
        }

        self.store.delete_user(username).await?;

        info!(username = %username, "User deleted");
        Ok(())
    }

    async fn delete_user_as(&self, actor: &str, username: &str) -> Result<(), AuthError> {
        if actor == username {
            return Err(AuthError::Forbidden(
                "Cannot delete your own account".to_string(),
            ));
        }

        self.delete_user(username).await
    }

    async fn update_password(&self, username: &str, new_password: &str) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::InvalidInput(
                "New password is required".to_string(),
            ));
        }

        let password_hash = self.hasher.hash_blocking(new_password).await?;
        self.store
            .update_user_password(username, password_hash)
            .await?;

        info!(username = %username, "Password updated");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    async fn get_user(&self, username: &str) -> Result<User, AuthError> {
        self.store
            .get_user(username)
            .await?
            .ok_or_else(|| AuthError::NotFound(username.to_string()))
    }
}
