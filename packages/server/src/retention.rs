use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::store::{DatasetStore, StoreError};

/// Some victims of a sweep could not be deleted. The others were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to evict datasets {failed_ids:?}")]
pub struct PartialEvictionError {
    pub evicted_ids: Vec<i32>,
    pub failed_ids: Vec<i32>,
}

#[derive(Debug, Error)]
pub enum RetentionError {
    /// The victim set itself could not be computed; nothing was deleted.
    #[error("Failed to compute retention victims: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    PartialEviction(#[from] PartialEvictionError),
}

/// Keeps only the most recent datasets.
///
/// Sweeps are serialized: victims are computed and deleted under one lock so
/// two concurrent ingestions cannot interleave their sweeps.
pub struct RetentionManager {
    store: Arc<dyn DatasetStore>,
    limit: u64,
    sweep: Mutex<()>,
}

impl RetentionManager {
    pub fn new(store: Arc<dyn DatasetStore>, limit: u64) -> Self {
        Self {
            store,
            limit,
            sweep: Mutex::new(()),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Delete every dataset outside the `limit` most recent.
    ///
    /// Must run after the triggering `create` has committed. Returns the
    /// evicted ids. A failed victim does not stop the sweep; the failures are
    /// reported together as [`PartialEvictionError`].
    pub async fn enforce(&self) -> Result<Vec<i32>, RetentionError> {
        let _guard = self.sweep.lock().await;

        let victims = self.store.ids_beyond(self.limit).await?;
        if victims.is_empty() {
            return Ok(Vec::new());
        }

        let mut evicted_ids = Vec::with_capacity(victims.len());
        let mut failed_ids = Vec::new();
        for id in victims {
            match self.store.delete(id).await {
                Ok(true) => evicted_ids.push(id),
                // Already gone, e.g. deleted directly in the meantime.
                Ok(false) => {}
                Err(e) => {
                    warn!(dataset_id = id, error = %e, "Failed to evict dataset");
                    failed_ids.push(id);
                }
            }
        }

        info!(
            limit = self.limit,
            evicted = evicted_ids.len(),
            failed = failed_ids.len(),
            "Retention sweep finished"
        );

        if failed_ids.is_empty() {
            Ok(evicted_ids)
        } else {
            Err(PartialEvictionError {
                evicted_ids,
                failed_ids,
            }
            .into())
        }
    }
}
