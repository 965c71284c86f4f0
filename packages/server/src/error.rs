use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::IngestError;
use serde::Serialize;

use crate::service::ServiceError;
use crate::store::StoreError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `SCHEMA_ERROR`, `EMPTY_PAYLOAD`,
    /// `TYPE_COERCION_ERROR`, `MALFORMED_PAYLOAD`, `VALIDATION_ERROR`,
    /// `NOT_FOUND`, `PERSISTENCE_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "SCHEMA_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Missing required columns: Pressure, Temperature")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Schema(String),
    EmptyPayload(String),
    TypeCoercion(String),
    Malformed(String),
    Validation(String),
    NotFound(String),
    Persistence(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Schema(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "SCHEMA_ERROR",
                    message: msg,
                },
            ),
            AppError::EmptyPayload(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "EMPTY_PAYLOAD",
                    message: msg,
                },
            ),
            AppError::TypeCoercion(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "TYPE_COERCION_ERROR",
                    message: msg,
                },
            ),
            AppError::Malformed(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "MALFORMED_PAYLOAD",
                    message: msg,
                },
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Persistence(detail) => {
                tracing::error!("Persistence error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "PERSISTENCE_ERROR",
                        message: "Failed to access dataset storage".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let message = err.to_string();
        match err {
            IngestError::Schema { .. } => AppError::Schema(message),
            IngestError::EmptyPayload => AppError::EmptyPayload(message),
            IngestError::TypeCoercion { .. } => AppError::TypeCoercion(message),
            IngestError::Malformed(_) => AppError::Malformed(message),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ingest(e) => e.into(),
            ServiceError::Store(e) => e.into(),
            ServiceError::Report(e) => AppError::Internal(e.to_string()),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::Validation(msg) => AppError::Validation(msg),
        }
    }
}
