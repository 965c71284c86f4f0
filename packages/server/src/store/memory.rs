use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{DatasetRecord, DatasetStore, ItemRecord, NewDataset, StoreError, StoredDataset};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Default)]
struct MemoryState {
    last_dataset_id: i32,
    last_item_id: i32,
    datasets: BTreeMap<i32, DatasetRecord>,
    items: HashMap<i32, Vec<ItemRecord>>,
}

impl MemoryState {
    fn history(&self) -> Vec<&DatasetRecord> {
        let mut headers: Vec<&DatasetRecord> = self.datasets.values().collect();
        headers.sort_by_key(|d| Reverse((d.uploaded_at, d.id)));
        headers
    }
}

/// Process-local dataset store.
///
/// Headers and items live behind one lock, so every operation sees them
/// change together.
pub struct MemoryDatasetStore {
    state: RwLock<MemoryState>,
    clock: Clock,
}

impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Use `clock` to stamp `uploaded_at` on new datasets.
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            state: RwLock::new(MemoryState::default()),
            clock: Box::new(clock),
        }
    }
}

impl Default for MemoryDatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetStore for MemoryDatasetStore {
    async fn create(&self, dataset: NewDataset) -> Result<StoredDataset, StoreError> {
        let total_count = dataset.row_count()?;
        let mut state = self.state.write().await;

        let id = state.last_dataset_id + 1;
        let header = DatasetRecord {
            id,
            file_name: dataset.file_name,
            uploaded_at: (self.clock)(),
            total_count,
            avg_flowrate: Some(dataset.stats.avg_flowrate),
            avg_pressure: Some(dataset.stats.avg_pressure),
            avg_temperature: Some(dataset.stats.avg_temperature),
        };

        let first_item_id = state.last_item_id + 1;
        let items: Vec<ItemRecord> = (0..total_count)
            .zip(dataset.rows)
            .map(|(position, row)| ItemRecord {
                id: first_item_id + position,
                dataset_id: id,
                position,
                name: row.name,
                kind: row.kind,
                flowrate: row.flowrate,
                pressure: row.pressure,
                temperature: row.temperature,
            })
            .collect();

        state.last_dataset_id = id;
        state.last_item_id += total_count;
        state.items.insert(id, items.clone());
        state.datasets.insert(id, header.clone());

        Ok(StoredDataset {
            dataset: header,
            items,
        })
    }

    async fn get(&self, id: i32) -> Result<Option<DatasetRecord>, StoreError> {
        Ok(self.state.read().await.datasets.get(&id).cloned())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<DatasetRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .history()
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn list_items(
        &self,
        dataset_id: i32,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<ItemRecord>, StoreError> {
        let state = self.state.read().await;
        let Some(items) = state.items.get(&dataset_id) else {
            return Ok(Vec::new());
        };

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(items.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count_items(&self, dataset_id: i32) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state.items.get(&dataset_id).map_or(0, |items| items.len() as u64))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        state.items.remove(&id);
        Ok(state.datasets.remove(&id).is_some())
    }

    async fn ids_beyond(&self, limit: u64) -> Result<Vec<i32>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .history()
            .into_iter()
            .skip(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|d| d.id)
            .collect())
    }
}
