//! Physiological parameter table.

use polars::prelude::DataFrame;

use tpg_defaults::DefaultTable;
use tpg_model::{ParameterTable, Result, SpeciesSet, TableKind};

use crate::species_table::merge_species_table;

/// Every default parameter for every species, with user overrides applied.
pub fn build_parameter_table(
    defaults: &DefaultTable,
    overrides: Option<&DataFrame>,
    species: &SpeciesSet,
    log_defaults: bool,
) -> Result<ParameterTable> {
    merge_species_table(TableKind::Parameters, defaults, overrides, species, log_defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn embedded_defaults_cover_every_species() {
        let defaults = tpg_defaults::parameters().unwrap();
        let species: SpeciesSet = vec!["Pinus".to_string(), "Fagus".to_string()].into();
        let overrides = DataFrame::new(vec![
            Series::new("parameter".into(), vec!["Tmin"]).into_column(),
            Series::new("Pinus".into(), vec![2.0]).into_column(),
        ])
        .unwrap();

        let table = build_parameter_table(defaults, Some(&overrides), &species, true).unwrap();
        assert_eq!(table.parameters().len(), defaults.len());
        assert_eq!(table.get("Tmin", "Pinus"), Some(2.0));
        assert_eq!(table.get("Tmin", "Fagus"), defaults.default_for("Tmin"));
        assert_eq!(table.get("CrownShape", "Fagus"), defaults.default_for("CrownShape"));
    }
}
