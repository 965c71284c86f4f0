use thiserror::Error;

/// Reasons a payload is refused before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// One or more required columns are absent from the header.
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// The header is valid but there are no data rows.
    #[error("The uploaded payload contains no data rows")]
    EmptyPayload,

    /// A numeric cell could not be read as a finite real number.
    /// `row` is the 1-based index of the data row (the header is not counted).
    #[error("Row {row}: column '{column}' has non-numeric value '{value}'")]
    TypeCoercion {
        row: usize,
        column: String,
        value: String,
    },

    /// The payload could not be decoded as a table at all.
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Malformed(err.to_string())
    }
}
