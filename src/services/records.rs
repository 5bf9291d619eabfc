use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::{ReportRecord, Store};

struct Snapshot {
    loaded_at: Instant,
    rows: Arc<Vec<ReportRecord>>,
}

/// Read-only access to the report records table, memoized for `ttl`.
pub struct RecordService {
    store: Store,
    ttl: Duration,
    cache: RwLock<Option<Snapshot>>,
}

impl RecordService {
    #[must_use]
    pub fn new(store: Store, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Every row, oldest first. Never older than the configured TTL.
    pub async fn load(&self) -> Result<Arc<Vec<ReportRecord>>> {
        if let Some(rows) = self.fresh().await {
            return Ok(rows);
        }

        let mut cache = self.cache.write().await;

        // Another caller may have refilled it while we waited for the lock.
        if let Some(snapshot) = cache.as_ref()
            && snapshot.loaded_at.elapsed() < self.ttl
        {
            return Ok(snapshot.rows.clone());
        }

        let rows = Arc::new(self.store.list_records().await?);
        debug!(rows = rows.len(), "Report records reloaded");

        *cache = Some(Snapshot {
            loaded_at: Instant::now(),
            rows: rows.clone(),
        });

        Ok(rows)
    }

    async fn fresh(&self) -> Option<Arc<Vec<ReportRecord>>> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|snapshot| snapshot.loaded_at.elapsed() < self.ttl)
            .map(|snapshot| snapshot.rows.clone())
    }

    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
