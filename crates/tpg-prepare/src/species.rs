//! Species (cohort) validation and the canonical species set.

use polars::prelude::DataFrame;
use tracing::debug;

use tpg_model::{PARAMETER_COLUMN, PrepareError, Result, SpeciesRecord, SpeciesSet, TableKind};

use crate::frame::TableView;

/// Columns every species table must carry.
pub const SPECIES_COLUMNS: [&str; 7] = [
    "species",
    "planted",
    "fertility",
    "stems_n",
    "biom_stem",
    "biom_root",
    "biom_foliage",
];

/// Validated cohorts and the species set they define.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSpecies {
    pub records: Vec<SpeciesRecord>,
    pub set: SpeciesSet,
}

/// Validate every cohort row; species order is the table's row order.
pub fn validate_species(df: &DataFrame) -> Result<PreparedSpecies> {
    let view = TableView::new(TableKind::Species, df);
    view.require_columns(&SPECIES_COLUMNS)?;
    if view.height() == 0 {
        return Err(view.missing_field("species"));
    }

    let mut records = Vec::with_capacity(view.height());
    let mut set = SpeciesSet::new();

    for row in 0..view.height() {
        let species = view.text_at("species", row)?;
        if species == PARAMETER_COLUMN {
            return Err(view.out_of_range(
                "species",
                species,
                "is reserved for the parameter-name column",
            ));
        }
        if !set.insert(species.clone()) {
            return Err(PrepareError::DuplicateSpecies { species });
        }

        let planted = view.month_at("planted", row)?;
        let fertility = view.f64_at("fertility", row)?;
        if !(0.0..=1.0).contains(&fertility) {
            return Err(view.out_of_range(
                "fertility",
                fertility,
                format!("must lie within [0, 1] (species '{species}')"),
            ));
        }

        let pool = |field: &str| -> Result<f64> {
            let value = view.f64_at(field, row)?;
            if value < 0.0 {
                return Err(view.out_of_range(
                    field,
                    value,
                    format!("must not be negative (species '{species}')"),
                ));
            }
            Ok(value)
        };
        let stems_n = pool("stems_n")?;
        let biom_stem = pool("biom_stem")?;
        let biom_root = pool("biom_root")?;
        let biom_foliage = pool("biom_foliage")?;

        records.push(SpeciesRecord {
            species,
            planted,
            fertility,
            stems_n,
            biom_stem,
            biom_root,
            biom_foliage,
        });
    }

    debug!(species = set.len(), names = ?set.names(), "species validated");
    Ok(PreparedSpecies { records, set })
}
