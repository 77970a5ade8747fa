//! Input assembly: the stages in dependency order.
//!
//! 1. **Settings**: merge user codes over the defaults
//! 2. **Site**: validate site scalars, derive the month window
//! 3. **Species**: validate cohorts, fix the canonical species set
//! 4. **Climate**: align forcing to the window
//! 5. **Thinning**: validate events against the species set
//! 6. **Parameters / size distribution**: merge overrides onto defaults
//!
//! The first failing stage aborts preparation and its error is returned as is.

use std::time::Instant;

use tracing::{debug, info, info_span};

use tpg_defaults::{DefaultTable, DefaultsError};
use tpg_model::{InputBundle, PrepareError, PrepareOptions, Result, ScenarioTables, TableKind};

use crate::climate::align_climate;
use crate::parameters::build_parameter_table;
use crate::settings::resolve_settings;
use crate::site::validate_site;
use crate::size_dist::build_size_dist_table;
use crate::species::{PreparedSpecies, validate_species};
use crate::thinning::build_thinning_schedule;

/// Prepares scenario tables against a fixed pair of default tables.
///
/// [`InputPreparer::new`] uses the embedded defaults; [`InputPreparer::with_defaults`]
/// injects others (for calibration runs or tests).
#[derive(Debug, Clone)]
pub struct InputPreparer<'d> {
    parameters: &'d DefaultTable,
    size_dist: &'d DefaultTable,
    options: PrepareOptions,
}

impl InputPreparer<'static> {
    /// Preparer backed by the embedded default tables.
    pub fn new() -> Result<Self> {
        let parameters =
            tpg_defaults::parameters().map_err(|err| defaults_error(TableKind::Parameters, &err))?;
        let size_dist =
            tpg_defaults::size_dist().map_err(|err| defaults_error(TableKind::SizeDist, &err))?;
        Ok(Self::with_defaults(parameters, size_dist))
    }
}

impl<'d> InputPreparer<'d> {
    pub fn with_defaults(parameters: &'d DefaultTable, size_dist: &'d DefaultTable) -> Self {
        Self {
            parameters,
            size_dist,
            options: PrepareOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PrepareOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PrepareOptions {
        &self.options
    }

    /// Validate and default every table of `tables` into an [`InputBundle`].
    pub fn prepare(&self, tables: &ScenarioTables) -> Result<InputBundle> {
        let span = info_span!("prepare_input");
        let _guard = span.enter();
        let start = Instant::now();
        let log_defaults = self.options.log_defaults;

        // =====================================================================
        // Stage 1: Settings
        // =====================================================================
        let resolved = resolve_settings(tables.settings.as_ref(), self.options.unknown_settings)?;
        let settings = resolved.settings;
        if !resolved.unknown_keys.is_empty() {
            debug!(unknown = ?resolved.unknown_keys, "unknown settings ignored");
        }

        // =====================================================================
        // Stage 2: Site
        // =====================================================================
        let site = validate_site(&tables.site)?;

        // =====================================================================
        // Stage 3: Species
        // =====================================================================
        let PreparedSpecies {
            records: species,
            set,
        } = validate_species(&tables.species)?;

        // =====================================================================
        // Stage 4-6: Species-dependent tables
        // =====================================================================
        let climate = align_climate(&tables.climate, site.window, &settings, log_defaults)?;
        let thinning = build_thinning_schedule(tables.thinning.as_ref(), &set, log_defaults)?;
        let parameters =
            build_parameter_table(self.parameters, tables.parameters.as_ref(), &set, log_defaults)?;
        let size_dist = build_size_dist_table(
            self.size_dist,
            tables.size_dist.as_ref(),
            &set,
            &settings,
            log_defaults,
        )?;

        info!(
            species = set.len(),
            months = climate.len(),
            thinnings = thinning.len(),
            duration_ms = start.elapsed().as_millis(),
            "input prepared"
        );

        Ok(InputBundle {
            site,
            species,
            climate,
            thinning,
            parameters,
            size_dist,
            settings,
        })
    }
}

fn defaults_error(table: TableKind, err: &DefaultsError) -> PrepareError {
    PrepareError::Defaults {
        table,
        message: err.to_string(),
    }
}

/// Prepare `tables` with the embedded defaults and default options.
///
/// # Example
///
/// ```
/// use polars::prelude::*;
/// use tpg_model::ScenarioTables;
///
/// let site = df!(
///     "latitude" => [51.5], "altitude" => [120.0], "soil_class" => [3],
///     "asw_i" => [100.0], "asw_min" => [0.0], "asw_max" => [200.0],
///     "from" => ["2000-01"], "to" => ["2001-12"],
/// )?;
/// let species = df!(
///     "species" => ["Pinus"], "planted" => ["1995-03"], "fertility" => [0.6],
///     "stems_n" => [900.0], "biom_stem" => [6.0], "biom_root" => [2.0],
///     "biom_foliage" => [1.0],
/// )?;
/// let climate = df!(
///     "tmp_min" => [-2.0, -1.0, 1.0, 4.0, 8.0, 11.0, 13.0, 12.0, 9.0, 5.0, 1.0, -1.0],
///     "tmp_max" => [4.0, 6.0, 10.0, 14.0, 18.0, 21.0, 23.0, 23.0, 19.0, 14.0, 8.0, 5.0],
///     "prcp" => [70.0; 12],
///     "srad" => [3.0, 5.0, 9.0, 14.0, 18.0, 20.0, 19.0, 16.0, 11.0, 7.0, 4.0, 2.0],
///     "frost_days" => [15.0, 12.0, 8.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 8.0, 13.0],
/// )?;
///
/// let bundle = tpg_prepare::prepare_input(&ScenarioTables::new(site, species, climate))?;
/// assert_eq!(bundle.n_months(), 24);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn prepare_input(tables: &ScenarioTables) -> Result<InputBundle> {
    prepare_input_with_options(tables, PrepareOptions::default())
}

/// Prepare `tables` with the embedded defaults and the given options.
pub fn prepare_input_with_options(
    tables: &ScenarioTables,
    options: PrepareOptions,
) -> Result<InputBundle> {
    InputPreparer::new()?.with_options(options).prepare(tables)
}
