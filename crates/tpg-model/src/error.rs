//! Error types for input preparation.

use thiserror::Error;

use crate::calendar::{MonthRange, YearMonth};
use crate::raw::TableKind;

/// Errors raised while validating and defaulting scenario inputs.
///
/// Every variant is terminal for the preparation call and names the table and
/// the field, species or value that must be corrected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PrepareError {
    // === Schema Errors ===
    /// Required column (or the whole table body) is absent.
    #[error("{table}: required field '{field}' is missing")]
    MissingField { table: TableKind, field: String },

    /// Required column is present but a cell is empty.
    #[error("{table}: field '{field}' has no value in row {row}")]
    MissingValue {
        table: TableKind,
        field: String,
        row: usize,
    },

    /// Cell could not be read as the expected type.
    #[error("{table}: invalid {field} value '{value}' in row {row}")]
    InvalidValue {
        table: TableKind,
        field: String,
        value: String,
        row: usize,
    },

    // === Species Consistency Errors ===
    /// Species identifier appears more than once in the species table.
    #[error("species: duplicate species '{species}'")]
    DuplicateSpecies { species: String },

    /// Row references a species absent from the species table.
    #[error("{table}: unknown species '{species}'")]
    UnknownSpecies { table: TableKind, species: String },

    /// Column header is not one of the scenario's species.
    #[error("{table}: column '{column}' is not a species of this scenario")]
    UnknownSpeciesColumn { table: TableKind, column: String },

    /// Override row names a parameter the model does not define.
    #[error("{table}: unknown parameter '{parameter}'")]
    UnknownParameterName { table: TableKind, parameter: String },

    // === Value Errors ===
    /// Value outside its permitted range or violating an ordering constraint.
    #[error("{table}: {field} = {value}: {reason}")]
    Range {
        table: TableKind,
        field: String,
        value: String,
        reason: String,
    },

    // === Climate Errors ===
    /// Aligned climate does not span the simulation window.
    #[error(
        "climate: series does not cover {requested}: {missing} month(s) missing, first missing {first_missing}"
    )]
    Coverage {
        requested: MonthRange,
        missing: usize,
        first_missing: YearMonth,
    },

    /// Column required by an enabled setting is absent or incomplete.
    #[error("{table}: column '{column}' is required when {setting} = 1")]
    MissingConditionalColumn {
        table: TableKind,
        column: String,
        setting: String,
    },

    // === Settings Errors ===
    /// Setting key not recognised (strict settings mode only).
    #[error("settings: unknown setting '{key}'")]
    UnknownSetting { key: String },

    /// Optional input made mandatory by a setting was not supplied.
    #[error("{input} is required when {setting} = 1: {hint}")]
    MissingRequiredInput {
        input: TableKind,
        setting: String,
        hint: String,
    },

    // === Infrastructure Errors ===
    /// Embedded default table could not be loaded.
    #[error("default {table} table unavailable: {message}")]
    Defaults { table: TableKind, message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    Frame { message: String },
}

impl From<polars::prelude::PolarsError> for PrepareError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Frame {
            message: err.to_string(),
        }
    }
}

impl PrepareError {
    /// The table the error refers to, when it refers to one.
    pub fn table(&self) -> Option<TableKind> {
        match self {
            Self::MissingField { table, .. }
            | Self::MissingValue { table, .. }
            | Self::InvalidValue { table, .. }
            | Self::UnknownSpecies { table, .. }
            | Self::UnknownSpeciesColumn { table, .. }
            | Self::UnknownParameterName { table, .. }
            | Self::Range { table, .. }
            | Self::MissingConditionalColumn { table, .. }
            | Self::Defaults { table, .. } => Some(*table),
            Self::MissingRequiredInput { input, .. } => Some(*input),
            Self::DuplicateSpecies { .. } => Some(TableKind::Species),
            Self::Coverage { .. } => Some(TableKind::Climate),
            Self::UnknownSetting { .. } => Some(TableKind::Settings),
            Self::Frame { .. } => None,
        }
    }
}

/// Result type for input preparation.
pub type Result<T> = std::result::Result<T, PrepareError>;
