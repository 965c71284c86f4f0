//! Dataset operations shared by every transport.
//!
//! Handlers stay thin: they decode a request, call one method here and map
//! the result onto a response.

use std::sync::Arc;

use common::{IngestError, RawTable, TypeDistribution, type_distribution, validate};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::report::{ReportError, ReportLayout, ReportRenderer};
use crate::retention::{RetentionError, RetentionManager};
use crate::store::{
    DatasetRecord, DatasetStore, ItemRecord, NewDataset, StoreError, StoredDataset,
};

/// Upper bound for `history` regardless of what the caller asks for.
pub const MAX_HISTORY_LIMIT: u64 = 100;

const MAX_FILE_NAME_CHARS: usize = 255;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),
}

/// Result of the retention sweep that followed an ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionOutcome {
    pub evicted_ids: Vec<i32>,
    /// Victims that could not be deleted; they are retried by the next sweep.
    pub failed_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub dataset: DatasetRecord,
    pub items: Vec<ItemRecord>,
    pub retention: RetentionOutcome,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub dataset: DatasetRecord,
    pub type_distribution: TypeDistribution,
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Clone)]
pub struct ItemPage {
    pub dataset_id: i32,
    pub total: u64,
    pub offset: u64,
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub dataset_id: i32,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    pub fn file_name(&self) -> String {
        format!("report_{}.pdf", self.dataset_id)
    }
}

pub struct DatasetService {
    store: Arc<dyn DatasetStore>,
    retention: RetentionManager,
    renderer: ReportRenderer,
}

impl DatasetService {
    pub fn new(store: Arc<dyn DatasetStore>, retention_limit: u64, layout: ReportLayout) -> Self {
        Self {
            retention: RetentionManager::new(Arc::clone(&store), retention_limit),
            renderer: ReportRenderer::new(layout),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn DatasetStore> {
        &self.store
    }

    pub fn retention_limit(&self) -> u64 {
        self.retention.limit()
    }

    /// Decode a CSV upload and ingest it.
    pub async fn ingest_csv(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<IngestOutcome, ServiceError> {
        let table = RawTable::from_csv(bytes)?;
        self.ingest(file_name, &table).await
    }

    /// Ingest rows given as JSON objects.
    pub async fn ingest_json(
        &self,
        file_name: &str,
        rows: &[Map<String, Value>],
    ) -> Result<IngestOutcome, ServiceError> {
        self.ingest(file_name, &RawTable::from_json_rows(rows)).await
    }

    /// Validate, persist, then apply retention.
    ///
    /// Nothing is stored unless every row validates. A failed eviction is
    /// reported in the outcome but never undoes the ingestion.
    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub async fn ingest(
        &self,
        file_name: &str,
        table: &RawTable,
    ) -> Result<IngestOutcome, ServiceError> {
        let file_name = validate_file_name(file_name)?;
        let rows = validate(table)?;

        // Once this returns the dataset is committed. Nothing below may fail
        // the ingestion or skip the sweep.
        let StoredDataset { dataset, items } =
            self.store.create(NewDataset::new(file_name, rows)).await?;

        info!(
            dataset_id = dataset.id,
            total_count = dataset.total_count,
            "Dataset ingested"
        );

        let retention = match self.retention.enforce().await {
            Ok(evicted_ids) => RetentionOutcome {
                evicted_ids,
                failed_ids: Vec::new(),
            },
            Err(RetentionError::PartialEviction(e)) => {
                warn!(failed = ?e.failed_ids, "Retention left datasets behind");
                RetentionOutcome {
                    evicted_ids: e.evicted_ids,
                    failed_ids: e.failed_ids,
                }
            }
            Err(RetentionError::Store(e)) => {
                warn!(error = %e, "Retention sweep skipped");
                RetentionOutcome::default()
            }
        };

        Ok(IngestOutcome {
            dataset,
            items,
            retention,
        })
    }

    /// Summary of `id`, or of the most recent dataset when `id` is `None`.
    pub async fn summary(&self, id: Option<i32>) -> Result<Summary, ServiceError> {
        let dataset = match id {
            Some(id) => self.find(id).await?,
            None => self
                .store
                .latest()
                .await?
                .ok_or_else(|| ServiceError::NotFound("No data available".into()))?,
        };

        let items = self.store.list_items(dataset.id, 0, None).await?;
        if items.is_empty() {
            return Err(ServiceError::NotFound("Dataset has no items".into()));
        }

        Ok(Summary {
            type_distribution: type_distribution(items.iter().map(|i| i.kind.as_str())),
            dataset,
            items,
        })
    }

    /// Most recent datasets. `limit` defaults to the retention limit.
    pub async fn history(&self, limit: Option<u64>) -> Result<Vec<DatasetRecord>, ServiceError> {
        let limit = limit
            .unwrap_or(self.retention.limit())
            .clamp(1, MAX_HISTORY_LIMIT);
        Ok(self.store.list_recent(limit).await?)
    }

    pub async fn items(
        &self,
        id: i32,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<ItemPage, ServiceError> {
        self.find(id).await?;
        let total = self.store.count_items(id).await?;
        let items = self.store.list_items(id, offset, limit).await?;
        Ok(ItemPage {
            dataset_id: id,
            total,
            offset,
            items,
        })
    }

    #[instrument(skip(self))]
    pub async fn render_report(&self, id: i32) -> Result<RenderedReport, ServiceError> {
        let dataset = self.find(id).await?;
        let detail_limit = self.renderer.layout().detail_limit as u64;
        let items = self.store.list_items(id, 0, Some(detail_limit)).await?;

        let bytes = self.renderer.render(&dataset, &items).to_pdf()?;
        Ok(RenderedReport {
            dataset_id: id,
            bytes,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        info!(dataset_id = id, "Dataset deleted");
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<DatasetRecord, ServiceError> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Dataset {id} not found"))
}

/// Trimmed file name, 1-255 characters.
fn validate_file_name(file_name: &str) -> Result<&str, ServiceError> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_FILE_NAME_CHARS {
        return Err(ServiceError::Validation(
            "File name must be 1-255 characters".into(),
        ));
    }
    Ok(trimmed)
}
