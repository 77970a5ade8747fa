//! Site-level conditions and the simulation window.

use serde::{Deserialize, Serialize};

use crate::calendar::MonthRange;

/// Soil texture class used by the soil-water modifier.
///
/// `Custom` (code 0) tells the engine to take the soil-water response from the
/// `SWconst0` / `SWpower0` parameters instead of the texture tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilClass {
    Custom,
    Sand,
    SandyLoam,
    ClayLoam,
    Clay,
}

impl SoilClass {
    pub fn code(self) -> i64 {
        match self {
            SoilClass::Custom => 0,
            SoilClass::Sand => 1,
            SoilClass::SandyLoam => 2,
            SoilClass::ClayLoam => 3,
            SoilClass::Clay => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SoilClass::Custom),
            1 => Some(SoilClass::Sand),
            2 => Some(SoilClass::SandyLoam),
            3 => Some(SoilClass::ClayLoam),
            4 => Some(SoilClass::Clay),
            _ => None,
        }
    }
}

/// Validated site conditions.
///
/// Invariants: `asw_min <= asw_i <= asw_max`, `latitude` in [-90, 90],
/// and the window is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Decimal degrees, negative in the southern hemisphere.
    pub latitude: f64,
    /// Metres above sea level.
    pub altitude: f64,
    pub soil_class: SoilClass,
    /// Initial available soil water (mm).
    pub asw_i: f64,
    /// Minimum available soil water (mm).
    pub asw_min: f64,
    /// Maximum available soil water (mm).
    pub asw_max: f64,
    /// Simulated months, `from` and `to` inclusive.
    pub window: MonthRange,
}
