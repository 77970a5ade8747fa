//! Error types for default table loading.

use thiserror::Error;

/// Errors that can occur when loading a default table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DefaultsError {
    /// Failed to read or parse the CSV content.
    #[error("failed to parse {table} defaults: {message}")]
    CsvParse { table: &'static str, message: String },

    /// A row carries no parameter name.
    #[error("{table} defaults: empty parameter name in row {row}")]
    EmptyName { table: &'static str, row: usize },

    /// A parameter name appears twice.
    #[error("{table} defaults: duplicate parameter '{name}'")]
    DuplicateName { table: &'static str, name: String },

    /// A default value is not a finite number.
    #[error("{table} defaults: invalid default '{value}' for '{name}'")]
    InvalidValue {
        table: &'static str,
        name: String,
        value: String,
    },
}

/// Result type for default table loading.
pub type Result<T> = std::result::Result<T, DefaultsError>;
