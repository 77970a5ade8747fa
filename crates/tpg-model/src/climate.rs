//! Monthly climate forcing aligned to the simulation window.

use serde::{Deserialize, Serialize};

use crate::calendar::{MonthRange, YearMonth};

/// Atmospheric CO2 used when the climate table carries no `co2` column (ppm).
pub const DEFAULT_CO2_PPM: f64 = 350.0;

/// One month of forcing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    pub year: i32,
    pub month: u32,
    /// Mean daily minimum temperature (°C).
    pub tmp_min: f64,
    /// Mean daily maximum temperature (°C).
    pub tmp_max: f64,
    /// Mean daily temperature (°C).
    pub tmp_ave: f64,
    /// Monthly precipitation (mm).
    pub prcp: f64,
    /// Mean daily solar radiation (MJ/m²/d).
    pub srad: f64,
    /// Frost days in the month.
    pub frost_days: f64,
    /// Mean daytime vapour pressure deficit (mbar).
    pub vpd_day: f64,
    /// Atmospheric CO2 (ppm).
    pub co2: f64,
    /// Isotopic composition of atmospheric CO2 (per mil); only required for
    /// d13C runs.
    pub d13catm: Option<f64>,
}

impl ClimateRecord {
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

/// Climate series covering exactly one [`MonthRange`], in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateSeries {
    pub window: MonthRange,
    pub records: Vec<ClimateRecord>,
}

impl ClimateSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for `month`, if it lies inside the window.
    pub fn get(&self, month: YearMonth) -> Option<&ClimateRecord> {
        if !self.window.contains(month) {
            return None;
        }
        let offset = (month.ordinal() - self.window.from().ordinal()) as usize;
        self.records.get(offset)
    }
}
