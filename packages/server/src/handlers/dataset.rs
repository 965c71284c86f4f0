use axum::Json;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::config::UploadConfig;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::upload::CsvUpload;
use crate::models::dataset::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Datasets",
    operation_id = "uploadDataset",
    summary = "Upload an equipment CSV file",
    description = "Validates and stores a CSV file sent as the multipart field `file`. The file must carry the columns `Equipment Name`, `Type`, `Flowrate`, `Pressure` and `Temperature`; other columns are ignored. Only the most recent datasets are kept; older ones are evicted after the upload is stored.",
    request_body(content_type = "multipart/form-data", description = "CSV file in the `file` field"),
    responses(
        (status = 201, description = "Dataset stored", body = IngestResponse),
        (status = 400, description = "Invalid payload (SCHEMA_ERROR, EMPTY_PAYLOAD, TYPE_COERCION_ERROR, MALFORMED_PAYLOAD, VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, upload), fields(file_name = %upload.file_name, bytes = upload.bytes.len()))]
pub async fn upload_dataset(
    State(state): State<AppState>,
    upload: CsvUpload,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .service
        .ingest_csv(&upload.file_name, &upload.bytes)
        .await?;

    Ok((StatusCode::CREATED, Json(IngestResponse::from(outcome))))
}

#[utoipa::path(
    post,
    path = "/datasets",
    tag = "Datasets",
    operation_id = "createDataset",
    summary = "Store equipment rows sent as JSON",
    description = "Same validation and retention rules as the CSV upload. Numeric readings may be JSON numbers or numeric strings.",
    request_body = CreateDatasetRequest,
    responses(
        (status = 201, description = "Dataset stored", body = IngestResponse),
        (status = 400, description = "Invalid payload (SCHEMA_ERROR, EMPTY_PAYLOAD, TYPE_COERCION_ERROR, MALFORMED_PAYLOAD, VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(file_name = %payload.file_name, rows = payload.rows.len()))]
pub async fn create_dataset(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDatasetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .service
        .ingest_json(&payload.file_name, &payload.rows)
        .await?;

    Ok((StatusCode::CREATED, Json(IngestResponse::from(outcome))))
}

#[utoipa::path(
    get,
    path = "/summary",
    tag = "Datasets",
    operation_id = "getLatestSummary",
    summary = "Summary of the most recent dataset",
    responses(
        (status = 200, description = "Dataset summary", body = SummaryResponse),
        (status = 404, description = "No dataset stored (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_latest_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = state.service.summary(None).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/summary/{id}",
    tag = "Datasets",
    operation_id = "getSummary",
    summary = "Summary of a dataset",
    description = "Header fields, stored averages, the type distribution and every item in source row order.",
    params(("id" = i32, Path, description = "Dataset ID")),
    responses(
        (status = 200, description = "Dataset summary", body = SummaryResponse),
        (status = 404, description = "Dataset not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = state.service.summary(Some(id)).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/history",
    tag = "Datasets",
    operation_id = "listHistory",
    summary = "Most recent datasets",
    description = "Newest first. Datasets uploaded at the same instant are ordered by ID, highest first.",
    params(HistoryParams),
    responses(
        (status = 200, description = "Dataset headers", body = Vec<DatasetResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<DatasetResponse>>, AppError> {
    let datasets = state.service.history(params.limit).await?;
    Ok(Json(datasets.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/datasets/{id}/items",
    tag = "Datasets",
    operation_id = "listItems",
    summary = "List the items of a dataset",
    params(
        ("id" = i32, Path, description = "Dataset ID"),
        ItemListParams,
    ),
    responses(
        (status = 200, description = "Items in source row order", body = ItemListResponse),
        (status = 404, description = "Dataset not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<ItemListParams>,
) -> Result<Json<ItemListResponse>, AppError> {
    let page = state
        .service
        .items(id, params.offset.unwrap_or(0), params.limit)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    delete,
    path = "/datasets/{id}",
    tag = "Datasets",
    operation_id = "deleteDataset",
    summary = "Delete a dataset and its items",
    params(("id" = i32, Path, description = "Dataset ID")),
    responses(
        (status = 204, description = "Dataset deleted"),
        (status = 404, description = "Dataset not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body limit layer for ingestion routes.
pub fn upload_body_limit(config: &UploadConfig) -> DefaultBodyLimit {
    DefaultBodyLimit::max(config.max_bytes)
}
