//! Per-cohort initial state and the canonical species set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;

/// Initial state of one species (cohort).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub species: String,
    /// Month the cohort was planted.
    pub planted: YearMonth,
    /// Site fertility rating in [0, 1].
    pub fertility: f64,
    /// Stems per hectare.
    pub stems_n: f64,
    /// Stem biomass (Mg/ha).
    pub biom_stem: f64,
    /// Root biomass (Mg/ha).
    pub biom_root: f64,
    /// Foliage biomass (Mg/ha).
    pub biom_foliage: f64,
}

/// Ordered set of species names, the reference for every per-species table.
///
/// Preserves species-table order; names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SpeciesSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl SpeciesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name`, returning `false` if it is already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of `name` in species-table order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<Vec<String>> for SpeciesSet {
    fn from(names: Vec<String>) -> Self {
        let mut set = SpeciesSet::new();
        for name in names {
            set.insert(name);
        }
        set
    }
}

impl From<SpeciesSet> for Vec<String> {
    fn from(set: SpeciesSet) -> Self {
        set.names
    }
}
