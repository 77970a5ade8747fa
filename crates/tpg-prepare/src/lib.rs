//! Validation and defaulting of 3-PG scenario inputs.
//!
//! [`prepare_input`] takes the raw [`ScenarioTables`](tpg_model::ScenarioTables)
//! of one scenario and returns an [`InputBundle`](tpg_model::InputBundle) the
//! simulation engine can run without further checks. Each table has its own
//! preparer; they are public so a caller can validate one table in isolation.

pub mod assemble;
pub mod climate;
mod frame;
pub mod parameters;
pub mod settings;
pub mod site;
pub mod size_dist;
pub mod species;
pub mod species_table;
pub mod thinning;

pub use assemble::{InputPreparer, prepare_input, prepare_input_with_options};
pub use climate::{align_climate, saturation_vapour_pressure, vpd_from_temperature};
pub use parameters::build_parameter_table;
pub use settings::{ResolvedSettings, resolve_settings};
pub use site::validate_site;
pub use size_dist::build_size_dist_table;
pub use species::{PreparedSpecies, validate_species};
pub use species_table::merge_species_table;
pub use thinning::build_thinning_schedule;
