use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipment_dataset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub file_name: String,
    pub uploaded_at: DateTimeUtc,

    /// Number of items owned by this dataset.
    pub total_count: i32,
    // Precomputed at ingestion; NULL only for a dataset without items.
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,

    #[sea_orm(has_many)]
    pub items: HasMany<super::equipment_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
