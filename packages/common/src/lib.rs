pub mod config;
pub mod ingest;
pub mod stats;

pub use ingest::{
    EquipmentRow, IngestError, RawRow, RawTable, REQUIRED_COLUMNS, ValidatedRows, validate,
};
pub use stats::{DatasetStats, TypeDistribution, summarize, type_distribution};
