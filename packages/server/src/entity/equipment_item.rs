use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipment_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub dataset_id: i32,
    #[sea_orm(belongs_to, from = "dataset_id", to = "id", on_delete = "Cascade")]
    pub dataset: HasOne<super::equipment_dataset::Entity>,

    /// Zero-based row index in the source payload.
    pub position: i32,

    pub name: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl ActiveModelBehavior for ActiveModel {}
