//! Error types for scenario ingestion.

use std::path::PathBuf;

use thiserror::Error;
use tpg_model::TableKind;

/// Errors that can occur while loading a scenario from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File starts with a byte-order mark of an unsupported encoding.
    #[error("unsupported encoding {encoding} in {path}; save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV header row has a blank column name.
    #[error("CSV file {path} has a blank column name")]
    EmptyColumnName { path: PathBuf },

    /// Settings file is not a JSON object of integer codes.
    #[error("failed to parse settings {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    // === Scenario Errors ===
    /// A mandatory scenario table has no file.
    #[error("scenario {dir} has no {table} table (expected {expected})")]
    MissingTable {
        dir: PathBuf,
        table: TableKind,
        expected: String,
    },

    /// Two files map to the same scenario table.
    #[error("scenario table {table} is ambiguous: {first} and {second}")]
    AmbiguousTable {
        table: TableKind,
        first: PathBuf,
        second: PathBuf,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl IngestError {
    /// Map an I/O error on `path` to `FileNotFound` or `FileRead`.
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
