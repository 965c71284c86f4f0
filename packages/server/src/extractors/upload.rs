use axum::extract::{FromRequest, Multipart, Request};

use crate::error::AppError;

/// Multipart field carrying the CSV file.
pub const FILE_FIELD: &str = "file";

/// A CSV file received as the `file` field of a multipart form.
///
/// The client-supplied file name becomes the dataset name. Other fields are
/// ignored.
pub struct CsvUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl<S> FromRequest<S> for CsvUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Malformed(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Malformed(format!("Multipart error: {e}")))?
        {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Malformed(format!("Failed to read file: {e}")))?;
            return Ok(CsvUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
        }

        Err(AppError::Validation(format!(
            "Missing '{FILE_FIELD}' field"
        )))
    }
}
