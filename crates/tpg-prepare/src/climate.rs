//! Climate alignment to the simulation window.
//!
//! Two raw layouts are accepted:
//!
//! - a 12-row monthly template, replicated across every year of the window
//! - a dated series with `year` and `month` columns, subset to the window
//!
//! Columns the engine needs but the user may omit (`tmp_ave`, `vpd_day`,
//! `co2`) are derived or defaulted per month. With d13C enabled, `co2` and
//! `d13catm` become mandatory.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use tracing::debug;

use tpg_model::settings::CALCULATE_D13C;
use tpg_model::{
    ClimateRecord, ClimateSeries, DEFAULT_CO2_PPM, MonthRange, PrepareError, Result, Settings,
    TableKind, YearMonth,
};

use crate::frame::TableView;

/// Columns every climate table must carry.
pub const CLIMATE_COLUMNS: [&str; 5] = ["tmp_min", "tmp_max", "prcp", "srad", "frost_days"];

/// Columns required when d13C is calculated.
pub const D13C_COLUMNS: [&str; 2] = ["co2", "d13catm"];

/// Rows in a monthly template.
pub const TEMPLATE_ROWS: usize = 12;

/// Absolute zero in °C; no monthly temperature may reach it.
pub const ABSOLUTE_ZERO_C: f64 = -273.15;

/// Saturation vapour pressure (mbar) at `temp` °C, Magnus form.
pub fn saturation_vapour_pressure(temp: f64) -> f64 {
    6.1078 * (17.2694 * temp / (temp + 237.3)).exp()
}

/// Mean daytime VPD (mbar) from monthly minimum and maximum temperature.
pub fn vpd_from_temperature(tmp_min: f64, tmp_max: f64) -> f64 {
    (saturation_vapour_pressure(tmp_max) - saturation_vapour_pressure(tmp_min)) / 2.0
}

/// Align the raw climate table to `window`.
///
/// The d13C column check runs on the raw table before any alignment; the
/// per-month completeness check runs on the aligned rows only.
pub fn align_climate(
    df: &DataFrame,
    window: MonthRange,
    settings: &Settings,
    log_defaults: bool,
) -> Result<ClimateSeries> {
    let view = TableView::new(TableKind::Climate, df);
    view.require_columns(&CLIMATE_COLUMNS)?;

    if settings.calculate_d13c
        && let Some(column) = D13C_COLUMNS.iter().find(|column| !view.has_column(column))
    {
        return Err(missing_d13c(column));
    }

    let rows = if view.height() == TEMPLATE_ROWS {
        replicate_template(&view, window)?
    } else {
        subset_series(&view, window)?
    };

    let mut defaulted = Defaulted::default();
    let mut records = Vec::with_capacity(rows.len());
    for (month, row) in rows {
        let record = read_month(&view, row, month, &mut defaulted)?;
        if settings.calculate_d13c {
            if record.d13catm.is_none() {
                return Err(missing_d13c("d13catm"));
            }
            if view.opt_f64_at("co2", row)?.is_none() {
                return Err(missing_d13c("co2"));
            }
        }
        records.push(record);
    }

    if log_defaults {
        defaulted.log(records.len());
    }
    debug!(
        %window,
        months = records.len(),
        raw_rows = view.height(),
        "climate aligned"
    );

    Ok(ClimateSeries { window, records })
}

fn missing_d13c(column: &str) -> PrepareError {
    PrepareError::MissingConditionalColumn {
        table: TableKind::Climate,
        column: column.to_string(),
        setting: CALCULATE_D13C.to_string(),
    }
}

/// Map every month of the window onto a template row.
fn replicate_template(view: &TableView<'_>, window: MonthRange) -> Result<Vec<(YearMonth, usize)>> {
    let mut by_month = [0usize; TEMPLATE_ROWS];
    if view.has_column("month") {
        let mut seen = [false; TEMPLATE_ROWS];
        for row in 0..TEMPLATE_ROWS {
            let month = view.i64_at("month", row)?;
            let slot = usize::try_from(month)
                .ok()
                .filter(|m| (1..=TEMPLATE_ROWS).contains(m))
                .ok_or_else(|| view.out_of_range("month", month, "must lie within 1..=12"))?
                - 1;
            if seen[slot] {
                return Err(view.out_of_range(
                    "month",
                    month,
                    "appears more than once in the monthly template",
                ));
            }
            seen[slot] = true;
            by_month[slot] = row;
        }
    } else {
        for (slot, row) in by_month.iter_mut().enumerate() {
            *row = slot;
        }
    }

    debug!(years = window.years().count(), "replicating monthly climate template");
    Ok(window
        .iter()
        .map(|month| (month, by_month[month.month as usize - 1]))
        .collect())
}

/// Select exactly the window's months from a dated series.
fn subset_series(view: &TableView<'_>, window: MonthRange) -> Result<Vec<(YearMonth, usize)>> {
    view.require_columns(&["year", "month"])?;

    let mut index: HashMap<YearMonth, usize> = HashMap::with_capacity(view.height());
    for row in 0..view.height() {
        let year = view.i64_at("year", row)?;
        let month = view.i64_at("month", row)?;
        let key = i32::try_from(year)
            .ok()
            .zip(u32::try_from(month).ok())
            .and_then(|(year, month)| YearMonth::new(year, month))
            .ok_or_else(|| {
                view.out_of_range("month", format!("{year}-{month}"), "is not a calendar month")
            })?;
        if index.insert(key, row).is_some() {
            return Err(view.out_of_range("year/month", key, "appears more than once"));
        }
    }

    let mut rows = Vec::with_capacity(window.len());
    let mut missing = Vec::new();
    for month in window.iter() {
        match index.get(&month) {
            Some(&row) => rows.push((month, row)),
            None => missing.push(month),
        }
    }

    if let Some(&first_missing) = missing.first() {
        return Err(PrepareError::Coverage {
            requested: window,
            missing: missing.len(),
            first_missing,
        });
    }
    Ok(rows)
}

/// Months whose optional columns were filled in.
#[derive(Debug, Default)]
struct Defaulted {
    tmp_ave: usize,
    vpd_day: usize,
    co2: usize,
}

impl Defaulted {
    fn log(&self, months: usize) {
        if self.tmp_ave > 0 {
            debug!(months = self.tmp_ave, of = months, "tmp_ave derived from tmp_min and tmp_max");
        }
        if self.vpd_day > 0 {
            debug!(months = self.vpd_day, of = months, "vpd_day derived from tmp_min and tmp_max");
        }
        if self.co2 > 0 {
            debug!(
                months = self.co2,
                of = months,
                co2 = DEFAULT_CO2_PPM,
                "co2 defaulted"
            );
        }
    }
}

fn read_month(
    view: &TableView<'_>,
    row: usize,
    month: YearMonth,
    defaulted: &mut Defaulted,
) -> Result<ClimateRecord> {
    let tmp_min = view.f64_at("tmp_min", row)?;
    let tmp_max = view.f64_at("tmp_max", row)?;
    if tmp_min > tmp_max {
        return Err(view.out_of_range(
            "tmp_min",
            tmp_min,
            format!("exceeds tmp_max ({tmp_max}) in {month}"),
        ));
    }
    if tmp_min <= ABSOLUTE_ZERO_C {
        return Err(view.out_of_range(
            "tmp_min",
            tmp_min,
            format!("must lie above absolute zero ({ABSOLUTE_ZERO_C}) in {month}"),
        ));
    }

    let tmp_ave = match view.opt_f64_at("tmp_ave", row)? {
        Some(value) => value,
        None => {
            defaulted.tmp_ave += 1;
            (tmp_min + tmp_max) / 2.0
        }
    };
    let vpd_day = match view.opt_f64_at("vpd_day", row)? {
        Some(value) => value,
        None => {
            defaulted.vpd_day += 1;
            let derived = vpd_from_temperature(tmp_min, tmp_max);
            if !derived.is_finite() || derived < 0.0 {
                return Err(view.out_of_range(
                    "vpd_day",
                    derived,
                    format!(
                        "cannot be derived from tmp_min ({tmp_min}) and tmp_max ({tmp_max}) in {month}"
                    ),
                ));
            }
            derived
        }
    };
    let co2 = match view.opt_f64_at("co2", row)? {
        Some(value) => value,
        None => {
            defaulted.co2 += 1;
            DEFAULT_CO2_PPM
        }
    };

    Ok(ClimateRecord {
        year: month.year,
        month: month.month,
        tmp_min,
        tmp_max,
        tmp_ave,
        prcp: view.f64_at("prcp", row)?,
        srad: view.f64_at("srad", row)?,
        frost_days: view.f64_at("frost_days", row)?,
        vpd_day,
        co2,
        d13catm: view.opt_f64_at("d13catm", row)?,
    })
}
