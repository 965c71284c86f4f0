//! Tabular payload decoding and validation.
//!
//! A payload arrives either as CSV bytes or as JSON rows, is decoded into a
//! [`RawTable`] of untyped string cells, and is then checked once against the
//! required-column contract by [`validate`]. Nothing downstream of
//! [`ValidatedRows`] looks columns up by name.

mod error;
mod table;
mod validator;

pub use error::IngestError;
pub use table::{RawRow, RawTable};
pub use validator::{
    EquipmentRow, FLOWRATE_COLUMN, NAME_COLUMN, PRESSURE_COLUMN, REQUIRED_COLUMNS,
    TEMPERATURE_COLUMN, TYPE_COLUMN, ValidatedRows, validate,
};
