use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use thiserror::Error;

use crate::constants::auth::BOOTSTRAP_USERNAME;
use crate::entities::users;

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Username already exists")]
    DuplicateKey(String),

    #[error("User not found")]
    NotFound(String),

    #[error("Cannot delete admin user")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub is_admin: bool,
    pub is_superadmin: bool,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            username: model.username,
            is_admin: model.is_admin,
            is_superadmin: model.is_superadmin,
            created_at: model.created_at,
            last_login: model.last_login,
        }
    }
}

/// Row about to be inserted. The hash must already be computed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_superadmin: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by username
    pub async fn get(&self, username: &str) -> Result<Option<User>, UserStoreError> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.conn)
            .await?;

        Ok(user.map(User::from))
    }

    /// Get user by username together with the stored hash (for verification only)
    pub async fn get_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, UserStoreError> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.conn)
            .await?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn exists(&self, username: &str) -> Result<bool, UserStoreError> {
        Ok(self.get(username).await?.is_some())
    }

    /// Insert a new row. The up-front lookup gives the common case a clean error;
    /// the primary key constraint still catches a concurrent insert of the same name.
    pub async fn insert(&self, user: NewUser) -> Result<(), UserStoreError> {
        if self.exists(&user.username).await? {
            return Err(UserStoreError::DuplicateKey(user.username));
        }

        let username = user.username.clone();
        let active = users::ActiveModel {
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            is_admin: Set(user.is_admin),
            is_superadmin: Set(user.is_superadmin),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            last_login: Set(None),
        };

        match users::Entity::insert(active)
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(UserStoreError::DuplicateKey(username))
                }
                _ => Err(err.into()),
            },
        }
    }

    /// Seed the bootstrap account if it is missing. Returns true when a row was created.
    pub async fn ensure_bootstrap_admin(
        &self,
        password_hash: String,
    ) -> Result<bool, UserStoreError> {
        let active = users::ActiveModel {
            username: Set(BOOTSTRAP_USERNAME.to_string()),
            password_hash: Set(password_hash),
            is_admin: Set(true),
            is_superadmin: Set(true),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            last_login: Set(None),
        };

        let inserted = users::Entity::insert(active)
            .on_conflict(
                OnConflict::column(users::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(inserted > 0)
    }

    /// Overwrite the stored hash for a user
    pub async fn update_password(
        &self,
        username: &str,
        password_hash: String,
    ) -> Result<(), UserStoreError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .filter(users::Column::Username.eq(username))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserStoreError::NotFound(username.to_string()));
        }

        Ok(())
    }

    pub async fn record_login(&self, username: &str) -> Result<(), UserStoreError> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = users::Entity::update_many()
            .col_expr(users::Column::LastLogin, Expr::value(Some(now)))
            .filter(users::Column::Username.eq(username))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserStoreError::NotFound(username.to_string()));
        }

        Ok(())
    }

    pub async fn delete(&self, username: &str) -> Result<(), UserStoreError> {
        if username == BOOTSTRAP_USERNAME {
            return Err(UserStoreError::Forbidden(username.to_string()));
        }

        let result = users::Entity::delete_by_id(username.to_string())
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserStoreError::NotFound(username.to_string()));
        }

        Ok(())
    }

    /// All users in creation order
    pub async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
