//! End-to-end tests for input preparation.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;
use tracing_subscriber::fmt::MakeWriter;

use tpg_model::{
    InputBundle, PrepareError, PrepareOptions, RawSettings, SETTING_KEYS, ScenarioTables,
    Settings, TableKind, YearMonth,
};
use tpg_prepare::{prepare_input, prepare_input_with_options};

fn column(name: &str, series: Series) -> polars::prelude::Column {
    series.with_name(name.into()).into_column()
}

fn site(from: &str, to: &str) -> DataFrame {
    DataFrame::new(vec![
        column("latitude", Series::new("".into(), [-42.1])),
        column("altitude", Series::new("".into(), [350.0])),
        column("soil_class", Series::new("".into(), [2])),
        column("asw_i", Series::new("".into(), [180.0])),
        column("asw_min", Series::new("".into(), [0.0])),
        column("asw_max", Series::new("".into(), [250.0])),
        column("from", Series::new("".into(), [from])),
        column("to", Series::new("".into(), [to])),
    ])
    .unwrap()
}

fn species(names: &[&str]) -> DataFrame {
    let n = names.len();
    DataFrame::new(vec![
        column("species", Series::new("".into(), names.to_vec())),
        column("planted", Series::new("".into(), vec!["1999-07"; n])),
        column("fertility", Series::new("".into(), vec![0.6; n])),
        column("stems_n", Series::new("".into(), vec![1200.0; n])),
        column("biom_stem", Series::new("".into(), vec![5.0; n])),
        column("biom_root", Series::new("".into(), vec![2.0; n])),
        column("biom_foliage", Series::new("".into(), vec![1.5; n])),
    ])
    .unwrap()
}

fn climate_template() -> DataFrame {
    let tmin: Vec<f64> = (1..=12).map(f64::from).collect();
    let tmax: Vec<f64> = tmin.iter().map(|t| t + 9.0).collect();
    DataFrame::new(vec![
        column("tmp_min", Series::new("".into(), tmin)),
        column("tmp_max", Series::new("".into(), tmax)),
        column("prcp", Series::new("".into(), vec![90.0; 12])),
        column("srad", Series::new("".into(), vec![14.0; 12])),
        column("frost_days", Series::new("".into(), vec![1.0; 12])),
    ])
    .unwrap()
}

/// 48 months, 2000-01 through 2003-12.
fn climate_series() -> DataFrame {
    let years: Vec<i32> = (2000..2004).flat_map(|y| [y; 12]).collect();
    let months: Vec<i32> = (0..4).flat_map(|_| 1..=12).collect();
    DataFrame::new(vec![
        column("year", Series::new("".into(), years)),
        column("month", Series::new("".into(), months)),
        column("tmp_min", Series::new("".into(), vec![4.0; 48])),
        column("tmp_max", Series::new("".into(), vec![15.0; 48])),
        column("prcp", Series::new("".into(), vec![75.0; 48])),
        column("srad", Series::new("".into(), vec![12.0; 48])),
        column("frost_days", Series::new("".into(), vec![3.0; 48])),
    ])
    .unwrap()
}

fn scenario() -> ScenarioTables {
    ScenarioTables::new(
        site("2000-01", "2002-12"),
        species(&["Eucalyptus", "Acacia"]),
        climate_template(),
    )
}

fn with_d13c_columns(mut climate: DataFrame) -> DataFrame {
    let n = climate.height();
    climate
        .with_column(column("co2", Series::new("".into(), vec![380.0; n])))
        .unwrap();
    climate
        .with_column(column("d13catm", Series::new("".into(), vec![-8.2; n])))
        .unwrap();
    climate
}

fn parameter_overrides(species: &str, rows: &[(&str, f64)]) -> DataFrame {
    let names: Vec<&str> = rows.iter().map(|(name, _)| *name).collect();
    let values: Vec<f64> = rows.iter().map(|(_, value)| *value).collect();
    DataFrame::new(vec![
        column("parameter", Series::new("".into(), names)),
        column(species, Series::new("".into(), values)),
    ])
    .unwrap()
}

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

// ============================================================================
// Climate alignment
// ============================================================================

#[test]
fn template_replicated_over_three_years() {
    let bundle = prepare_input(&scenario()).unwrap();
    let records = &bundle.climate.records;
    assert_eq!(records.len(), 36);

    let months: Vec<u32> = records.iter().map(|r| r.month).collect();
    let expected: Vec<u32> = (0..3).flat_map(|_| 1..=12).collect();
    assert_eq!(months, expected);

    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let expected: Vec<i32> = (2000..=2002).flat_map(|y| [y; 12]).collect();
    assert_eq!(years, expected);
}

#[test]
fn series_subset_to_site_window() {
    let mut tables = scenario();
    tables.climate = climate_series();
    let bundle = prepare_input(&tables).unwrap();
    assert_eq!(bundle.climate.len(), 36);
    assert_eq!(bundle.climate.records[0].year_month(), ym(2000, 1));
    assert_eq!(bundle.climate.records[35].year_month(), ym(2002, 12));
    assert!(bundle.climate.get(ym(2003, 1)).is_none());
}

#[test]
fn window_beyond_series_is_a_coverage_error() {
    let mut tables = scenario();
    tables.site = site("2002-01", "2004-12");
    tables.climate = climate_series();
    let err = prepare_input(&tables).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"climate: series does not cover 2002-01..2004-12: 12 month(s) missing, first missing 2004-01"
    );
}

// ============================================================================
// Settings-conditional inputs
// ============================================================================

#[test]
fn d13c_needs_co2_and_d13catm() {
    let tables = scenario().with_settings(RawSettings::new().with("calculate_d13c", 1));
    let err = prepare_input(&tables).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"climate: column 'co2' is required when calculate_d13c = 1"
    );

    let mut tables = tables;
    tables.climate = with_d13c_columns(climate_template());
    let bundle = prepare_input(&tables).unwrap();
    assert!(bundle.settings.calculate_d13c);
    assert!(bundle.climate.records.iter().all(|r| r.d13catm == Some(-8.2)));
}

#[test]
fn bias_correction_needs_size_dist() {
    let settings: RawSettings = serde_json::from_str(r#"{"correct_bias": 1}"#).unwrap();
    let tables = scenario().with_settings(settings);
    let err = prepare_input(&tables).unwrap_err();
    assert!(matches!(
        err,
        PrepareError::MissingRequiredInput {
            input: TableKind::SizeDist,
            ..
        }
    ));

    let tables = tables.with_size_dist(parameter_overrides(
        "Eucalyptus",
        &[("Dscale0", -1.7), ("DscaleB", 0.9)],
    ));
    let bundle = prepare_input(&tables).unwrap();
    assert_eq!(bundle.size_dist.get("Dscale0", "Eucalyptus"), Some(-1.7));
    assert_eq!(bundle.size_dist.get("Dscale0", "Acacia"), Some(0.0));
}

// ============================================================================
// Species consistency
// ============================================================================

#[test]
fn every_species_table_uses_the_canonical_set() {
    let thinning = DataFrame::new(vec![
        column("species", Series::new("".into(), ["Acacia"])),
        column("age", Series::new("".into(), [8.0])),
        column("stems_n", Series::new("".into(), [600.0])),
    ])
    .unwrap();
    let tables = scenario()
        .with_thinning(thinning)
        .with_parameters(parameter_overrides("Acacia", &[("pFS2", 0.7)]));
    let bundle = prepare_input(&tables).unwrap();

    let expected = ["Eucalyptus".to_string(), "Acacia".to_string()];
    assert_eq!(bundle.species_set().names(), &expected);
    assert_eq!(bundle.parameters.species(), &expected);
    assert_eq!(bundle.size_dist.species(), &expected);
    assert!(
        bundle
            .thinning
            .events
            .iter()
            .all(|event| bundle.species_set().contains(&event.species))
    );
}

#[test]
fn species_errors_name_the_offender() {
    let thinning = DataFrame::new(vec![
        column("species", Series::new("".into(), ["Pinus"])),
        column("age", Series::new("".into(), [8.0])),
        column("stems_n", Series::new("".into(), [600.0])),
    ])
    .unwrap();
    let err = prepare_input(&scenario().with_thinning(thinning)).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"thinning: unknown species 'Pinus'");

    let tables = scenario().with_parameters(parameter_overrides("Pinus", &[("pFS2", 0.7)]));
    let err = prepare_input(&tables).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"parameters: column 'Pinus' is not a species of this scenario"
    );

    let tables = scenario().with_parameters(parameter_overrides("Acacia", &[("pFS3", 0.7)]));
    let err = prepare_input(&tables).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"parameters: unknown parameter 'pFS3'");

    let mut tables = scenario();
    tables.species = species(&["Acacia", "Acacia"]);
    let err = prepare_input(&tables).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"species: duplicate species 'Acacia'");
}

// ============================================================================
// Defaulting
// ============================================================================

#[test]
fn prepared_parameters_are_a_fixed_point() {
    let tables = scenario().with_parameters(parameter_overrides("Acacia", &[("aWS", 0.14)]));
    let first = prepare_input(&tables).unwrap();

    let again = scenario().with_parameters(first.parameters.to_frame().unwrap());
    let second = prepare_input(&again).unwrap();
    assert_eq!(second.parameters, first.parameters);
    assert_eq!(second.parameters.get("aWS", "Acacia"), Some(0.14));
}

#[test]
fn site_errors_surface_verbatim() {
    let mut tables = scenario();
    tables.site = site("2003-01", "2002-12");
    let err = prepare_input(&tables).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"site: from = 2003-01: is after to (2002-12)");
}

// ============================================================================
// Logging
// ============================================================================

#[derive(Clone, Default)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    fn contents(&self) -> String {
        String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
    }
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn unknown_setting_is_logged_as_warning() {
    let writer = BufferWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let tables = scenario().with_settings(RawSettings::new().with("canopy_layers", 2));
    let bundle = tracing::subscriber::with_default(subscriber, || prepare_input(&tables)).unwrap();
    assert_eq!(bundle.settings, Settings::default());

    let logs = writer.contents();
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("ignoring unknown setting"), "{logs}");
    assert!(logs.contains("canopy_layers"), "{logs}");
}

#[test]
fn strict_mode_fails_on_unknown_setting() {
    let tables = scenario().with_settings(RawSettings::new().with("canopy_layers", 2));
    let err = prepare_input_with_options(&tables, PrepareOptions::strict()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"settings: unknown setting 'canopy_layers'");
}

// ============================================================================
// Properties
// ============================================================================

fn prepare(settings: RawSettings) -> Result<InputBundle, PrepareError> {
    let mut tables = scenario().with_settings(settings);
    tables.climate = with_d13c_columns(climate_template());
    tables.size_dist = Some(parameter_overrides("Acacia", &[("Dshape0", 2.1)]));
    prepare_input(&tables)
}

proptest! {
    #[test]
    fn settings_omitted_keys_take_defaults(
        mask in proptest::collection::vec(any::<bool>(), SETTING_KEYS.len()),
        variants in proptest::collection::vec(1i64..=2, 4),
        flags in proptest::collection::vec(0i64..=1, 2),
    ) {
        let codes: Vec<i64> = variants.into_iter().chain(flags).collect();
        let mut raw = RawSettings::new();
        for ((key, code), keep) in SETTING_KEYS.iter().zip(&codes).zip(&mask) {
            if *keep {
                raw = raw.with(*key, *code);
            }
        }

        let bundle = prepare(raw).unwrap();
        let defaults = Settings::default();
        for (idx, key) in SETTING_KEYS.iter().enumerate() {
            let expected = if mask[idx] { Some(codes[idx]) } else { defaults.code(key) };
            prop_assert_eq!(bundle.settings.code(key), expected);
        }
    }

    #[test]
    fn preparation_is_deterministic(
        start_year in 1990i32..2030,
        start_month in 1u32..=12,
        span in 0i64..60,
    ) {
        let from = ym(start_year, start_month);
        let to = YearMonth::from_ordinal(from.ordinal() + span);
        let mut tables = scenario();
        tables.site = site(&from.to_string(), &to.to_string());

        let first = prepare_input(&tables).unwrap();
        let second = prepare_input(&tables).unwrap();
        prop_assert_eq!(first.n_months(), (span + 1) as usize);
        prop_assert_eq!(first, second);
    }
}
