//! Scenario directory discovery and loading.
//!
//! A scenario directory holds one file per table, named after the table:
//!
//! | table        | file             | required |
//! |--------------|------------------|----------|
//! | site         | `site.csv`       | yes      |
//! | species      | `species.csv`    | yes      |
//! | climate      | `climate.csv`    | yes      |
//! | thinning     | `thinning.csv`   | no       |
//! | parameters   | `parameters.csv` | no       |
//! | size_dist    | `size_dist.csv`  | no       |
//! | settings     | `settings.json`  | no       |
//!
//! File names match case-insensitively. Other files are ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, info};

use tpg_model::{ScenarioTables, TableKind};

use crate::csv::read_csv_table;
use crate::error::{IngestError, Result};
use crate::settings::load_settings;

/// File name expected for `table`.
pub fn file_name(table: TableKind) -> String {
    match table {
        TableKind::Settings => format!("{table}.json"),
        _ => format!("{table}.csv"),
    }
}

const ALL_TABLES: [TableKind; 7] = [
    TableKind::Site,
    TableKind::Species,
    TableKind::Climate,
    TableKind::Thinning,
    TableKind::Parameters,
    TableKind::SizeDist,
    TableKind::Settings,
];

/// Map each scenario table present in `dir` to its file.
pub fn discover_scenario_files(dir: &Path) -> Result<BTreeMap<TableKind, PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut found: BTreeMap<TableKind, PathBuf> = BTreeMap::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(table) = ALL_TABLES
            .into_iter()
            .find(|table| file_name(*table).eq_ignore_ascii_case(name))
        else {
            continue;
        };

        if let Some(first) = found.get(&table) {
            let (first, second) = if first.as_path() <= path.as_path() {
                (first.clone(), path)
            } else {
                (path, first.clone())
            };
            return Err(IngestError::AmbiguousTable {
                table,
                first,
                second,
            });
        }
        found.insert(table, path);
    }

    debug!(dir = %dir.display(), tables = found.len(), "scenario files discovered");
    Ok(found)
}

/// Load every table of the scenario in `dir`.
///
/// Only file-level problems are reported here; the tables themselves are
/// validated during preparation.
pub fn load_scenario(dir: &Path) -> Result<ScenarioTables> {
    let mut files = discover_scenario_files(dir)?;

    let mut required = |table: TableKind| -> Result<DataFrame> {
        let path = files.remove(&table).ok_or_else(|| IngestError::MissingTable {
            dir: dir.to_path_buf(),
            table,
            expected: file_name(table),
        })?;
        read_csv_table(&path)
    };
    let site = required(TableKind::Site)?;
    let species = required(TableKind::Species)?;
    let climate = required(TableKind::Climate)?;

    let mut tables = ScenarioTables::new(site, species, climate);
    for (table, path) in files {
        match table {
            TableKind::Thinning => tables.thinning = Some(read_csv_table(&path)?),
            TableKind::Parameters => tables.parameters = Some(read_csv_table(&path)?),
            TableKind::SizeDist => tables.size_dist = Some(read_csv_table(&path)?),
            TableKind::Settings => tables.settings = Some(load_settings(&path)?),
            _ => {}
        }
    }

    info!(
        dir = %dir.display(),
        thinning = tables.thinning.is_some(),
        parameters = tables.parameters.is_some(),
        size_dist = tables.size_dist.is_some(),
        settings = tables.settings.is_some(),
        "scenario loaded"
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "a,b\n1,2\n").unwrap();
    }

    #[test]
    fn file_names_follow_table_names() {
        assert_eq!(file_name(TableKind::SizeDist), "size_dist.csv");
        assert_eq!(file_name(TableKind::Settings), "settings.json");
    }

    #[test]
    fn discovery_ignores_case_and_unrelated_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Site.CSV");
        touch(dir.path(), "climate.csv");
        touch(dir.path(), "notes.csv");
        std::fs::create_dir(dir.path().join("species.csv")).unwrap();

        let files = discover_scenario_files(dir.path()).unwrap();
        let tables: Vec<TableKind> = files.keys().copied().collect();
        assert_eq!(tables, vec![TableKind::Site, TableKind::Climate]);
    }

    #[test]
    fn duplicate_files_are_ambiguous() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "site.csv");
        touch(dir.path(), "SITE.csv");
        let err = discover_scenario_files(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::AmbiguousTable {
                table: TableKind::Site,
                ..
            }
        ));
    }

    #[test]
    fn not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("site.csv");
        std::fs::write(&file, "a\n").unwrap();
        assert!(matches!(
            discover_scenario_files(&file),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
