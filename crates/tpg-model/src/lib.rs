//! Data model for 3-PG input preparation.
//!
//! Raw scenario tables ([`ScenarioTables`]) go in, a validated
//! [`InputBundle`] comes out. This crate holds both ends plus the settings,
//! calendar, options and error types shared by the preparation crates.

pub mod bundle;
pub mod calendar;
pub mod climate;
pub mod error;
pub mod options;
pub mod raw;
pub mod settings;
pub mod site;
pub mod species;
pub mod table;
pub mod thinning;

pub use bundle::InputBundle;
pub use calendar::{MonthRange, YearMonth};
pub use climate::{ClimateRecord, ClimateSeries, DEFAULT_CO2_PPM};
pub use error::{PrepareError, Result};
pub use options::{PrepareOptions, UnknownSettingsMode};
pub use raw::{RawSettings, ScenarioTables, TableKind};
pub use settings::{HeightModel, ModelVariant, SETTING_KEYS, Settings};
pub use site::{SiteConfig, SoilClass};
pub use species::{SpeciesRecord, SpeciesSet};
pub use table::{PARAMETER_COLUMN, ParameterTable, SizeDistributionTable, SpeciesTable};
pub use thinning::{DEFAULT_THINNING_RATIO, ThinningEvent, ThinningSchedule};
