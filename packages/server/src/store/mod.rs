//! Dataset persistence.
//!
//! A dataset header and its items are written and removed as one unit; no
//! caller can observe a header without its items or the reverse.

mod error;
mod memory;
mod relational;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{DatasetStats, EquipmentRow, ValidatedRows, summarize};
use serde::Serialize;

pub use error::StoreError;
pub use memory::MemoryDatasetStore;
pub use relational::SeaOrmDatasetStore;

use crate::entity::{equipment_dataset, equipment_item};

/// A persisted dataset header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRecord {
    pub id: i32,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: i32,
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
}

/// A persisted equipment row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub id: i32,
    pub dataset_id: i32,
    pub position: i32,
    pub name: String,
    pub kind: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// A dataset as committed by [`DatasetStore::create`], items in row order.
#[derive(Debug, Clone)]
pub struct StoredDataset {
    pub dataset: DatasetRecord,
    pub items: Vec<ItemRecord>,
}

/// A validated dataset waiting to be persisted.
///
/// Built only from [`ValidatedRows`], so `stats.total_count == rows.len()` and
/// `rows` is never empty.
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub file_name: String,
    pub stats: DatasetStats,
    pub rows: Vec<EquipmentRow>,
}

impl NewDataset {
    pub fn new(file_name: impl Into<String>, rows: ValidatedRows) -> Self {
        let stats = summarize(&rows);
        Self {
            file_name: file_name.into(),
            stats,
            rows: rows.into_vec(),
        }
    }

    fn row_count(&self) -> Result<i32, StoreError> {
        i32::try_from(self.rows.len())
            .map_err(|_| StoreError::Rejected(format!("too many rows: {}", self.rows.len())))
    }
}

/// Storage for datasets and their items.
///
/// History order is `uploaded_at` descending with ties broken by `id`
/// descending. Item order is the source row order.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Persist a header with all of its items atomically.
    ///
    /// The returned items are the stored rows, read before the write is
    /// visible to anyone else.
    async fn create(&self, dataset: NewDataset) -> Result<StoredDataset, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<DatasetRecord>, StoreError>;

    /// The most recently ingested dataset, if any.
    async fn latest(&self) -> Result<Option<DatasetRecord>, StoreError> {
        Ok(self.list_recent(1).await?.into_iter().next())
    }

    /// At most `limit` headers in history order.
    async fn list_recent(&self, limit: u64) -> Result<Vec<DatasetRecord>, StoreError>;

    /// Items of a dataset in source row order. `limit = None` returns all.
    async fn list_items(
        &self,
        dataset_id: i32,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<ItemRecord>, StoreError>;

    async fn count_items(&self, dataset_id: i32) -> Result<u64, StoreError>;

    /// Remove a header and all of its items atomically.
    ///
    /// Returns `false` if the dataset did not exist.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// Identities of every dataset outside the first `limit` in history order.
    async fn ids_beyond(&self, limit: u64) -> Result<Vec<i32>, StoreError>;
}

impl From<equipment_dataset::Model> for DatasetRecord {
    fn from(m: equipment_dataset::Model) -> Self {
        Self {
            id: m.id,
            file_name: m.file_name,
            uploaded_at: m.uploaded_at,
            total_count: m.total_count,
            avg_flowrate: m.avg_flowrate,
            avg_pressure: m.avg_pressure,
            avg_temperature: m.avg_temperature,
        }
    }
}

impl From<equipment_item::Model> for ItemRecord {
    fn from(m: equipment_item::Model) -> Self {
        Self {
            id: m.id,
            dataset_id: m.dataset_id,
            position: m.position,
            name: m.name,
            kind: m.kind,
            flowrate: m.flowrate,
            pressure: m.pressure,
            temperature: m.temperature,
        }
    }
}
