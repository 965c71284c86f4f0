use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/pdf/{id}",
    tag = "Reports",
    operation_id = "downloadReport",
    summary = "Download a PDF report for a dataset",
    description = "Header fields, stored averages and the first items of the dataset in source row order. The number of listed items is configured by `report.detail_limit` (default 10).",
    params(("id" = i32, Path, description = "Dataset ID")),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Dataset not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Report could not be produced (INTERNAL_ERROR, PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.service.render_report(id).await?;
    let disposition = format!("attachment; filename=\"{}\"", report.file_name());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    ))
}
