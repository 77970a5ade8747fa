//! Size-distribution (bias correction) parameter table.

use polars::prelude::DataFrame;

use tpg_defaults::DefaultTable;
use tpg_model::settings::CORRECT_BIAS;
use tpg_model::{PrepareError, Result, Settings, SizeDistributionTable, SpeciesSet, TableKind};

use crate::species_table::merge_species_table;

/// Every size-distribution parameter for every species.
///
/// With `correct_bias` on, the user must supply a non-empty table: the
/// defaults are placeholders and carry no bias correction of their own.
pub fn build_size_dist_table(
    defaults: &DefaultTable,
    overrides: Option<&DataFrame>,
    species: &SpeciesSet,
    settings: &Settings,
    log_defaults: bool,
) -> Result<SizeDistributionTable> {
    let supplied = overrides.is_some_and(|df| df.height() > 0);
    if settings.correct_bias && !supplied {
        return Err(PrepareError::MissingRequiredInput {
            input: TableKind::SizeDist,
            setting: CORRECT_BIAS.to_string(),
            hint: format!("supply a size_dist table or set {CORRECT_BIAS} = 0"),
        });
    }
    merge_species_table(TableKind::SizeDist, defaults, overrides, species, log_defaults)
}
