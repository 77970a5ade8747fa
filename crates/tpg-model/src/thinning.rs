//! Scheduled thinning interventions.

use serde::{Deserialize, Serialize};

/// Removal ratio applied when a thinning row leaves a type column empty.
pub const DEFAULT_THINNING_RATIO: f64 = 1.0;

/// One thinning of one species.
///
/// The `foliage`, `root` and `stem` ratios compare the biomass per removed tree
/// with the stand-average tree: 1 removes average trees, values above 1 thin
/// from above, below 1 thin from below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinningEvent {
    pub species: String,
    /// Stand age (years) at which the thinning happens.
    pub age: f64,
    /// Stems per hectare remaining after the thinning.
    pub stems_n: f64,
    pub foliage: f64,
    pub root: f64,
    pub stem: f64,
}

/// Thinning events ordered by species (species-table order), then age.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThinningSchedule {
    pub events: Vec<ThinningEvent>,
}

impl ThinningSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Events of one species, in age order.
    pub fn for_species<'a>(&'a self, species: &'a str) -> impl Iterator<Item = &'a ThinningEvent> {
        self.events.iter().filter(move |event| event.species == species)
    }
}
