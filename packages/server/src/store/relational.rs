use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use super::{DatasetRecord, DatasetStore, ItemRecord, NewDataset, StoreError, StoredDataset};
use crate::entity::{equipment_dataset, equipment_item};

/// Rows per INSERT statement; keeps bind parameters under the Postgres limit.
const INSERT_CHUNK: usize = 1000;

/// Relational store backed by sea-orm.
#[derive(Clone)]
pub struct SeaOrmDatasetStore {
    db: DatabaseConnection,
}

impl SeaOrmDatasetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl DatasetStore for SeaOrmDatasetStore {
    async fn create(&self, dataset: NewDataset) -> Result<StoredDataset, StoreError> {
        let total_count = dataset.row_count()?;
        let stats = dataset.stats;

        let txn = self.db.begin().await?;

        let header = equipment_dataset::ActiveModel {
            file_name: Set(dataset.file_name),
            uploaded_at: Set(Utc::now()),
            total_count: Set(total_count),
            avg_flowrate: Set(Some(stats.avg_flowrate)),
            avg_pressure: Set(Some(stats.avg_pressure)),
            avg_temperature: Set(Some(stats.avg_temperature)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let items: Vec<equipment_item::ActiveModel> = (0..total_count)
            .zip(dataset.rows)
            .map(|(position, row)| equipment_item::ActiveModel {
                dataset_id: Set(header.id),
                position: Set(position),
                name: Set(row.name),
                kind: Set(row.kind),
                flowrate: Set(row.flowrate),
                pressure: Set(row.pressure),
                temperature: Set(row.temperature),
                ..Default::default()
            })
            .collect();

        for chunk in items.chunks(INSERT_CHUNK) {
            equipment_item::Entity::insert_many(chunk.iter().cloned())
                .exec(&txn)
                .await?;
        }

        let items = equipment_item::Entity::find()
            .filter(equipment_item::Column::DatasetId.eq(header.id))
            .order_by_asc(equipment_item::Column::Position)
            .all(&txn)
            .await?;

        txn.commit().await?;
        debug!(dataset_id = header.id, total_count, "Dataset persisted");

        Ok(StoredDataset {
            dataset: header.into(),
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    async fn get(&self, id: i32) -> Result<Option<DatasetRecord>, StoreError> {
        Ok(equipment_dataset::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<DatasetRecord>, StoreError> {
        let models = equipment_dataset::Entity::find()
            .order_by_desc(equipment_dataset::Column::UploadedAt)
            .order_by_desc(equipment_dataset::Column::Id)
            .limit(Some(limit))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_items(
        &self,
        dataset_id: i32,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<ItemRecord>, StoreError> {
        let models = equipment_item::Entity::find()
            .filter(equipment_item::Column::DatasetId.eq(dataset_id))
            .order_by_asc(equipment_item::Column::Position)
            .offset(Some(offset))
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_items(&self, dataset_id: i32) -> Result<u64, StoreError> {
        Ok(equipment_item::Entity::find()
            .filter(equipment_item::Column::DatasetId.eq(dataset_id))
            .count(&self.db)
            .await?)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let txn = self.db.begin().await?;

        equipment_item::Entity::delete_many()
            .filter(equipment_item::Column::DatasetId.eq(id))
            .exec(&txn)
            .await?;
        let result = equipment_dataset::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn ids_beyond(&self, limit: u64) -> Result<Vec<i32>, StoreError> {
        Ok(equipment_dataset::Entity::find()
            .select_only()
            .column(equipment_dataset::Column::Id)
            .order_by_desc(equipment_dataset::Column::UploadedAt)
            .order_by_desc(equipment_dataset::Column::Id)
            .offset(Some(limit))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?)
    }
}
