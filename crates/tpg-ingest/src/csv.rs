//! CSV table reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Rows scanned to infer column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::from_io(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Reject UTF-16 files; UTF-8 with or without BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| IngestError::from_io(path, e))?;

    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }
    Ok(())
}

/// Fail on blank header names; they cannot be matched to any field.
pub fn validate_headers(df: &DataFrame, path: &Path) -> Result<()> {
    let blank = df
        .get_column_names()
        .iter()
        .any(|name| name.trim().trim_matches('\u{feff}').is_empty());
    if blank {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Read a single-header CSV file into a DataFrame.
///
/// A header-only file gives a DataFrame with zero rows; whether that is
/// acceptable is up to the caller.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;
    validate_encoding(path)?;

    let parse_error = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    validate_headers(&df, path)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "csv table read"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_table() {
        let file = create_temp_csv(b"parameter,Pinus,Fagus\npFS2,0.8,1.1\naWS,0.1,0.09\n");
        let df = read_csv_table(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let file = create_temp_csv(b"species,age,stems_n\n");
        let df = read_csv_table(file.path()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_utf16_is_rejected() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'a', 0]);
        let err = validate_encoding(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            }
        ));
    }

    #[test]
    fn test_utf8_bom_is_accepted() {
        let file = create_temp_csv("\u{feff}a,b\n1,2\n".as_bytes());
        assert!(validate_encoding(file.path()).is_ok());
    }

    #[test]
    fn test_size_limit() {
        let file = create_temp_csv(b"a,b\n1,2\n");
        assert!(check_file_size_with_limit(file.path(), 1024).is_ok());
        let err = check_file_size_with_limit(file.path(), 4).unwrap_err();
        assert!(matches!(err, IngestError::FileTooLarge { size: 8, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = read_csv_table(Path::new("/nonexistent/site.csv")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
