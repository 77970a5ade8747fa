//! Scenario ingestion for 3-PG input preparation.
//!
//! Loads the tables of one scenario from disk into the raw
//! [`ScenarioTables`](tpg_model::ScenarioTables) form accepted by
//! `tpg_prepare::prepare_input`:
//!
//! - **CSV loading**: UTF-8 files, one header row, size-limited
//! - **Settings**: a JSON object of integer codes
//! - **Discovery**: one file per table, named after the table
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let tables = tpg_ingest::load_scenario(Path::new("scenarios/tumut"))?;
//! assert!(tables.site.height() > 0);
//! # Ok::<(), tpg_ingest::IngestError>(())
//! ```

mod csv;
mod error;
mod scenario;
mod settings;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_table,
    validate_encoding, validate_headers,
};

// === Settings ===
pub use settings::load_settings;

// === Scenario Discovery ===
pub use scenario::{discover_scenario_files, file_name, load_scenario};
