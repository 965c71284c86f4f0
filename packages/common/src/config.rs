use serde::Deserialize;

/// Dataset retention window.
#[derive(Debug, Deserialize, Clone)]
pub struct RetentionConfig {
    /// Number of most recent datasets kept after each ingestion. Default: 5.
    /// Must be at least 1.
    #[serde(default = "default_retention_limit")]
    pub limit: u64,
}

fn default_retention_limit() -> u64 {
    5
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            limit: default_retention_limit(),
        }
    }
}

/// Report layout options.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Items listed under "Equipment Details". Default: 10.
    #[serde(default = "default_detail_limit")]
    pub detail_limit: usize,
}

fn default_detail_limit() -> usize {
    10
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            detail_limit: default_detail_limit(),
        }
    }
}

/// Upload limits.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Maximum request body for ingestion endpoints, in bytes. Default: 16 MiB.
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_upload_bytes(),
        }
    }
}
