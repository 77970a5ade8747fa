//! Site validation and simulation-window derivation.

use polars::prelude::DataFrame;
use tracing::debug;

use tpg_model::{MonthRange, Result, SiteConfig, SoilClass, TableKind};

use crate::frame::TableView;

/// Columns every site table must carry.
pub const SITE_COLUMNS: [&str; 8] = [
    "latitude",
    "altitude",
    "soil_class",
    "asw_i",
    "asw_min",
    "asw_max",
    "from",
    "to",
];

/// Validate the single-row site table and derive the month window.
///
/// `from` and `to` are read as calendar months; `to` includes its whole month.
pub fn validate_site(df: &DataFrame) -> Result<SiteConfig> {
    let view = TableView::new(TableKind::Site, df);
    view.require_columns(&SITE_COLUMNS)?;

    match view.height() {
        0 => return Err(view.missing_value(SITE_COLUMNS[0], 0)),
        1 => {}
        n => return Err(view.out_of_range("rows", n, "site table must have exactly one row")),
    }

    let latitude = view.f64_at("latitude", 0)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(view.out_of_range("latitude", latitude, "must lie within [-90, 90]"));
    }
    let altitude = view.f64_at("altitude", 0)?;

    let soil_code = view.i64_at("soil_class", 0)?;
    let soil_class = SoilClass::from_code(soil_code)
        .ok_or_else(|| view.out_of_range("soil_class", soil_code, "must be one of 0, 1, 2, 3, 4"))?;

    let asw_i = view.f64_at("asw_i", 0)?;
    let asw_min = view.f64_at("asw_min", 0)?;
    let asw_max = view.f64_at("asw_max", 0)?;
    if asw_min < 0.0 {
        return Err(view.out_of_range("asw_min", asw_min, "must not be negative"));
    }
    if asw_min > asw_max {
        return Err(view.out_of_range(
            "asw_min",
            asw_min,
            format!("exceeds asw_max ({asw_max})"),
        ));
    }
    if !(asw_min..=asw_max).contains(&asw_i) {
        return Err(view.out_of_range(
            "asw_i",
            asw_i,
            format!("must lie within [asw_min, asw_max] = [{asw_min}, {asw_max}]"),
        ));
    }

    let from = view.month_at("from", 0)?;
    let to = view.month_at("to", 0)?;
    let window = MonthRange::new(from, to)
        .ok_or_else(|| view.out_of_range("from", from, format!("is after to ({to})")))?;

    debug!(
        %window,
        months = window.len(),
        latitude,
        soil_class = soil_code,
        "site validated"
    );

    Ok(SiteConfig {
        latitude,
        altitude,
        soil_class,
        asw_i,
        asw_min,
        asw_max,
        window,
    })
}
