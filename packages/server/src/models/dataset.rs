use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::service::{IngestOutcome, ItemPage, RetentionOutcome, Summary};
use crate::store::{DatasetRecord, ItemRecord};

/// JSON ingestion payload.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateDatasetRequest {
    /// Dataset name, 1-255 characters after trimming.
    #[schema(example = "pump_station.csv")]
    pub file_name: String,
    /// One object per row, keyed by column name. Values may be strings or
    /// numbers.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Map<String, Value>>,
}

/// Query parameters for the upload history.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct HistoryParams {
    /// Number of datasets (1-100, default: the retention limit).
    #[param(example = 5)]
    pub limit: Option<u64>,
}

/// Query parameters for listing items.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ItemListParams {
    /// Items to skip (default 0).
    #[param(example = 0)]
    pub offset: Option<u64>,
    /// Maximum number of items (default: all).
    #[param(example = 50)]
    pub limit: Option<u64>,
}

/// Dataset header with averages computed at ingestion time.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DatasetResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "pump_station.csv")]
    pub file_name: String,
    #[schema(example = "2025-09-01T08:00:00Z")]
    pub uploaded_at: DateTime<Utc>,
    #[schema(example = 3)]
    pub total_count: i32,
    #[schema(example = 20.0)]
    pub avg_flowrate: Option<f64>,
    #[schema(example = 5.5)]
    pub avg_pressure: Option<f64>,
    #[schema(example = 310.0)]
    pub avg_temperature: Option<f64>,
}

impl From<DatasetRecord> for DatasetResponse {
    fn from(d: DatasetRecord) -> Self {
        Self {
            id: d.id,
            file_name: d.file_name,
            uploaded_at: d.uploaded_at,
            total_count: d.total_count,
            avg_flowrate: d.avg_flowrate,
            avg_pressure: d.avg_pressure,
            avg_temperature: d.avg_temperature,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ItemResponse {
    #[schema(example = 10)]
    pub id: i32,
    /// Owning dataset ID.
    #[schema(example = 1)]
    pub dataset: i32,
    /// Zero-based row position within the source payload.
    #[schema(example = 0)]
    pub position: i32,
    #[schema(example = "Pump-1")]
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "Pump")]
    pub kind: String,
    #[schema(example = 10.0)]
    pub flowrate: f64,
    #[schema(example = 5.5)]
    pub pressure: f64,
    #[schema(example = 300.0)]
    pub temperature: f64,
}

impl From<ItemRecord> for ItemResponse {
    fn from(i: ItemRecord) -> Self {
        Self {
            id: i.id,
            dataset: i.dataset_id,
            position: i.position,
            name: i.name,
            kind: i.kind,
            flowrate: i.flowrate,
            pressure: i.pressure,
            temperature: i.temperature,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RetentionResponse {
    /// Datasets removed to stay within the retention limit.
    pub evicted_ids: Vec<i32>,
    /// Datasets that should have been removed but could not be.
    pub failed_ids: Vec<i32>,
}

impl From<RetentionOutcome> for RetentionResponse {
    fn from(r: RetentionOutcome) -> Self {
        Self {
            evicted_ids: r.evicted_ids,
            failed_ids: r.failed_ids,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct IngestResponse {
    #[serde(flatten)]
    pub dataset: DatasetResponse,
    pub items: Vec<ItemResponse>,
    pub retention: RetentionResponse,
}

impl From<IngestOutcome> for IngestResponse {
    fn from(o: IngestOutcome) -> Self {
        Self {
            dataset: o.dataset.into(),
            items: o.items.into_iter().map(Into::into).collect(),
            retention: o.retention.into(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AveragesResponse {
    pub flowrate: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "pump_station.csv")]
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    #[schema(example = 3)]
    pub total_count: i32,
    pub averages: AveragesResponse,
    /// Item count per equipment type.
    pub type_distribution: BTreeMap<String, u64>,
    /// All items in source row order.
    pub data: Vec<ItemResponse>,
}

impl From<Summary> for SummaryResponse {
    fn from(s: Summary) -> Self {
        let d = s.dataset;
        Self {
            id: d.id,
            file_name: d.file_name,
            uploaded_at: d.uploaded_at,
            total_count: d.total_count,
            averages: AveragesResponse {
                flowrate: d.avg_flowrate,
                pressure: d.avg_pressure,
                temperature: d.avg_temperature,
            },
            type_distribution: s.type_distribution,
            data: s.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ItemListResponse {
    #[schema(example = 1)]
    pub dataset_id: i32,
    /// Total number of items in the dataset.
    #[schema(example = 120)]
    pub total: u64,
    #[schema(example = 0)]
    pub offset: u64,
    pub data: Vec<ItemResponse>,
}

impl From<ItemPage> for ItemListResponse {
    fn from(p: ItemPage) -> Self {
        Self {
            dataset_id: p.dataset_id,
            total: p.total,
            offset: p.offset,
            data: p.items.into_iter().map(Into::into).collect(),
        }
    }
}
