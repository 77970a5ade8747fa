//! The prepared, engine-ready input bundle.

use serde::{Deserialize, Serialize};

use crate::climate::ClimateSeries;
use crate::settings::Settings;
use crate::site::SiteConfig;
use crate::species::{SpeciesRecord, SpeciesSet};
use crate::table::{ParameterTable, SizeDistributionTable};
use crate::thinning::ThinningSchedule;

/// Everything the simulation engine needs, validated and fully defaulted.
///
/// Every per-species table is indexed by exactly the species in
/// [`InputBundle::species_set`], and `climate` spans `site.window` month for
/// month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBundle {
    pub site: SiteConfig,
    pub species: Vec<SpeciesRecord>,
    pub climate: ClimateSeries,
    pub thinning: ThinningSchedule,
    pub parameters: ParameterTable,
    pub size_dist: SizeDistributionTable,
    pub settings: Settings,
}

impl InputBundle {
    /// Canonical species set, in species-table order.
    pub fn species_set(&self) -> SpeciesSet {
        self.species.iter().map(|record| record.species.clone()).collect::<Vec<_>>().into()
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn n_months(&self) -> usize {
        self.climate.len()
    }
}
