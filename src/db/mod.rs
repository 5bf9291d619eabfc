use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::constants::auth::BOOTSTRAP_USERNAME;
use crate::services::password::PasswordHasher;

pub mod migrator;
pub mod repositories;

pub use repositories::record::ReportRecord;
pub use repositories::user::{NewUser, User, UserStoreError};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply database migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    /// Make sure the bootstrap admin exists. Safe to call on every start.
    pub async fn initialize_credentials(&self, security: &SecurityConfig) -> Result<()> {
        let users = self.user_repo();
        if users.exists(BOOTSTRAP_USERNAME).await? {
            return Ok(());
        }

        let hasher = PasswordHasher::from_config(security)?;
        let hash = hasher.hash_blocking(&security.bootstrap_password).await?;

        if users.ensure_bootstrap_admin(hash).await? {
            info!("Created bootstrap user '{}'", BOOTSTRAP_USERNAME);
        }

        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn record_repo(&self) -> repositories::record::RecordRepository {
        repositories::record::RecordRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn get_user(&self, username: &str) -> Result<Option<User>, UserStoreError> {
        self.user_repo().get(username).await
    }

    pub async fn get_user_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, UserStoreError> {
        self.user_repo().get_with_password(username).await
    }

    pub async fn insert_user(&self, user: NewUser) -> Result<(), UserStoreError> {
        self.user_repo().insert(user).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        password_hash: String,
    ) -> Result<(), UserStoreError> {
        self.user_repo()
            .update_password(username, password_hash)
            .await
    }

    pub async fn record_user_login(&self, username: &str) -> Result<(), UserStoreError> {
        self.user_repo().record_login(username).await
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), UserStoreError> {
        self.user_repo().delete(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserStoreError> {
        self.user_repo().list().await
    }

    // ========== Record Repository Methods ==========

    pub async fn list_records(&self) -> Result<Vec<ReportRecord>> {
        self.record_repo().list_all().await
    }

    pub async fn recent_records(&self, limit: u64) -> Result<Vec<ReportRecord>> {
        self.record_repo().recent(limit).await
    }

    pub async fn count_records(&self) -> Result<u64> {
        self.record_repo().count().await
    }
}
