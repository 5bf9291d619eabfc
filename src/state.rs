use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, PasswordHasher, RecordService, SeaOrmAuthService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub record_service: Arc<RecordService>,
}

impl SharedState {
    /// Opens the store, applies migrations and seeds the bootstrap account.
    /// Any failure here is fatal: nothing works without the credential table.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        store
            .initialize_credentials(&config.security)
            .await
            .context("Failed to initialize credential store")?;

        let hasher = PasswordHasher::from_config(&config.security)?;

        let auth_service =
            Arc::new(SeaOrmAuthService::new(store.clone(), hasher)) as Arc<dyn AuthService>;

        let record_service = Arc::new(RecordService::new(
            store.clone(),
            Duration::from_secs(config.reports.cache_ttl_seconds),
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            record_service,
        })
    }
}
