use std::collections::HashMap;

use serde_json::{Map, Value};

use super::error::IngestError;

/// One undecoded data row: column name to raw cell text.
///
/// A column the row has no value for is simply absent.
pub type RawRow = HashMap<String, String>;

/// An ordered, untyped table as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    /// Decode CSV bytes. The first record is the header.
    ///
    /// Header names are trimmed; cells are kept verbatim. A short row leaves
    /// its trailing columns missing. A row with more fields than the header
    /// is malformed, as is non-UTF-8 input. When a header name repeats, the
    /// first column wins.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(bytes);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(IngestError::Malformed(format!(
                    "row {} has {} fields, header has {}",
                    rows.len() + 1,
                    record.len(),
                    columns.len()
                )));
            }
            let mut row = RawRow::with_capacity(columns.len());
            for (column, cell) in columns.iter().zip(record.iter()) {
                row.entry(column.clone()).or_insert_with(|| cell.to_string());
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Build a table from JSON objects, one per row.
    ///
    /// The column set is the union of all keys. Strings are
    /// taken as-is, numbers and booleans by their JSON text, `null` as a
    /// missing cell, and nested values by their serialized JSON.
    pub fn from_json_rows(objects: &[Map<String, Value>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(objects.len());

        for object in objects {
            let mut row = RawRow::with_capacity(object.len());
            for (key, value) in object {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
                let cell = match value {
                    Value::Null => continue,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                row.insert(key.clone(), cell);
            }
            rows.push(row);
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
