//! Default 3-PG parameter tables.
//!
//! Two tables ship with the crate, both embedded at compile time:
//!
//! - [`parameters`]: physiological parameters (partitioning, modifiers,
//!   canopy, allometry, d13C)
//! - [`size_dist`]: Weibull size-distribution parameters used for bias
//!   correction
//!
//! Each is parsed once per process and shared read-only afterwards.
//!
//! # Example
//!
//! ```
//! let defaults = tpg_defaults::parameters().expect("embedded parameters");
//! assert_eq!(defaults.default_for("pFS2"), Some(1.0));
//! ```

use std::sync::LazyLock;

pub mod embedded;
pub mod error;
pub mod table;

pub use error::{DefaultsError, Result};
pub use table::{DefaultEntry, DefaultTable, load_from_str};

static PARAMETERS: LazyLock<Result<DefaultTable>> =
    LazyLock::new(|| load_from_str("parameters", embedded::PARAMETERS_CSV));

static SIZE_DIST: LazyLock<Result<DefaultTable>> =
    LazyLock::new(|| load_from_str("size_dist", embedded::SIZE_DIST_CSV));

/// Default physiological parameters.
pub fn parameters() -> Result<&'static DefaultTable> {
    PARAMETERS.as_ref().map_err(Clone::clone)
}

/// Default size-distribution parameters.
pub fn size_dist() -> Result<&'static DefaultTable> {
    SIZE_DIST.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_parameters_load() {
        let table = parameters().unwrap();
        assert!(table.len() > 80);
        assert_eq!(table.default_for("pFS20"), Some(0.15));
        assert_eq!(table.default_for("Qa"), Some(-90.0));
        assert!(table.contains("CrownShape"));
    }

    #[test]
    fn embedded_size_dist_loads() {
        let table = size_dist().unwrap();
        assert_eq!(table.len(), 30);
        assert!(table.contains("Dscale0"));
        assert!(table.contains("wslocationC"));
        assert!(table.entries().iter().all(|entry| entry.default == 0.0));
    }

    #[test]
    fn tables_are_loaded_once() {
        let first = parameters().unwrap();
        let second = parameters().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn table_serializes_as_entry_list() {
        let table = DefaultTable::from_pairs([("aWS", 0.095)]);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with('['));
        let round: DefaultTable = serde_json::from_str(&json).unwrap();
        assert_eq!(round, table);
    }
}
