use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::{equipment_dataset, equipment_item};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Create the indexes backing history ordering and item retrieval.
///
/// Failures are logged and ignored; queries stay correct without them.
pub async fn ensure_indexes(db: &DatabaseConnection) {
    // ORDER BY uploaded_at DESC, id DESC (history, retention victims)
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_equipment_dataset_uploaded_id")
        .table(equipment_dataset::Entity)
        .col(equipment_dataset::Column::UploadedAt)
        .col(equipment_dataset::Column::Id)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_equipment_dataset_uploaded_id", &stmt).await;

    // WHERE dataset_id = ? ORDER BY position
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_equipment_item_dataset_position")
        .table(equipment_item::Entity)
        .col(equipment_item::Column::DatasetId)
        .col(equipment_item::Column::Position)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_equipment_item_dataset_position", &stmt).await;
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: &str) {
    match db.execute_unprepared(stmt).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}
