use serde::{Deserialize, Serialize};

use super::error::IngestError;
use super::table::{RawRow, RawTable};

pub const NAME_COLUMN: &str = "Equipment Name";
pub const TYPE_COLUMN: &str = "Type";
pub const FLOWRATE_COLUMN: &str = "Flowrate";
pub const PRESSURE_COLUMN: &str = "Pressure";
pub const TEMPERATURE_COLUMN: &str = "Temperature";

/// Columns every payload must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    NAME_COLUMN,
    TYPE_COLUMN,
    FLOWRATE_COLUMN,
    PRESSURE_COLUMN,
    TEMPERATURE_COLUMN,
];

/// A normalized equipment row. All readings are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRow {
    pub name: String,
    /// Category label (the `Type` column).
    pub kind: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Rows that passed [`validate`]. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRows(Vec<EquipmentRow>);

impl ValidatedRows {
    pub fn as_slice(&self) -> &[EquipmentRow] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<EquipmentRow> {
        self.0
    }
}

impl std::ops::Deref for ValidatedRows {
    type Target = [EquipmentRow];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Check a raw table against the required-column contract and coerce every
/// row.
///
/// Checks run in order: missing columns, then emptiness, then per-row
/// numeric coercion. The first bad cell fails the whole payload.
pub fn validate(table: &RawTable) -> Result<ValidatedRows, IngestError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::Schema { missing });
    }

    if table.is_empty() {
        return Err(IngestError::EmptyPayload);
    }

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index + 1, row))
        .collect::<Result<Vec<_>, _>>()
        .map(ValidatedRows)
}

fn normalize_row(row_number: usize, row: &RawRow) -> Result<EquipmentRow, IngestError> {
    Ok(EquipmentRow {
        name: text_cell(row, NAME_COLUMN),
        kind: text_cell(row, TYPE_COLUMN),
        flowrate: numeric_cell(row_number, row, FLOWRATE_COLUMN)?,
        pressure: numeric_cell(row_number, row, PRESSURE_COLUMN)?,
        temperature: numeric_cell(row_number, row, TEMPERATURE_COLUMN)?,
    })
}

fn text_cell(row: &RawRow, column: &str) -> String {
    row.get(column).cloned().unwrap_or_default()
}

fn numeric_cell(row_number: usize, row: &RawRow, column: &str) -> Result<f64, IngestError> {
    let raw = row.get(column).map(String::as_str).unwrap_or_default();
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(IngestError::TypeCoercion {
            row: row_number,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}
