//! Default table type and CSV loader.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::error::{DefaultsError, Result};

/// A model parameter and its default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultEntry {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub default: f64,
}

/// Ordered list of parameters with their defaults.
///
/// The order is the row order of the prepared tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DefaultEntry>", into = "Vec<DefaultEntry>")]
pub struct DefaultTable {
    entries: Vec<DefaultEntry>,
    index: HashMap<String, usize>,
}

impl DefaultTable {
    /// Build from entries; later duplicates are dropped by the loader before
    /// reaching here, so names are assumed unique.
    fn from_unique(entries: Vec<DefaultEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.name.clone(), idx))
            .collect();
        Self { entries, index }
    }

    /// Build a table from `(name, default)` pairs. Duplicate names keep the
    /// first value.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut entries: Vec<DefaultEntry> = Vec::new();
        let mut seen = HashSet::new();
        for (name, default) in pairs {
            let name = name.into();
            if !seen.insert(name.clone()) {
                continue;
            }
            entries.push(DefaultEntry {
                name,
                description: String::new(),
                unit: String::new(),
                default,
            });
        }
        Self::from_unique(entries)
    }

    pub fn entries(&self) -> &[DefaultEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Row position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn default_for(&self, name: &str) -> Option<f64> {
        self.position(name).map(|idx| self.entries[idx].default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<DefaultEntry>> for DefaultTable {
    fn from(entries: Vec<DefaultEntry>) -> Self {
        let mut seen = HashSet::new();
        let unique = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.name.clone()))
            .collect();
        Self::from_unique(unique)
    }
}

impl From<DefaultTable> for Vec<DefaultEntry> {
    fn from(table: DefaultTable) -> Self {
        table.entries
    }
}

/// Row of a default-table CSV.
#[derive(Debug, Deserialize)]
struct DefaultCsvRow {
    parameter: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    unit: String,
    default: String,
}

/// Parse a default table from CSV text with a
/// `parameter,description,unit,default` header.
pub fn load_from_str(table: &'static str, content: &str) -> Result<DefaultTable> {
    let cursor = Cursor::new(content.as_bytes());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(cursor);

    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for (row, result) in reader.deserialize::<DefaultCsvRow>().enumerate() {
        let record = result.map_err(|e| DefaultsError::CsvParse {
            table,
            message: e.to_string(),
        })?;

        let name = record.parameter.trim().to_string();
        if name.is_empty() {
            return Err(DefaultsError::EmptyName { table, row: row + 1 });
        }
        if !seen.insert(name.clone()) {
            return Err(DefaultsError::DuplicateName { table, name });
        }

        let default = record
            .default
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| DefaultsError::InvalidValue {
                table,
                name: name.clone(),
                value: record.default.clone(),
            })?;

        entries.push(DefaultEntry {
            name,
            description: record.description,
            unit: record.unit,
            default,
        });
    }

    Ok(DefaultTable::from_unique(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rows_in_order() {
        let table = load_from_str(
            "test",
            "parameter,description,unit,default\nb,Second,-,2\na,First,-,1.5\n",
        )
        .unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(table.default_for("a"), Some(1.5));
        assert_eq!(table.position("b"), Some(0));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = load_from_str(
            "test",
            "parameter,description,unit,default\na,,,1\na,,,2\n",
        );
        assert!(matches!(result, Err(DefaultsError::DuplicateName { .. })));
    }

    #[test]
    fn rejects_non_numeric_default() {
        let result = load_from_str("test", "parameter,description,unit,default\na,,,high\n");
        assert!(matches!(result, Err(DefaultsError::InvalidValue { .. })));
    }

    #[test]
    fn from_pairs_keeps_first_duplicate() {
        let table = DefaultTable::from_pairs([("x", 1.0), ("y", 2.0), ("x", 3.0)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.default_for("x"), Some(1.0));
    }
}
