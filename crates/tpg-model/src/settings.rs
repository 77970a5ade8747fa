//! Model settings: which sub-model variants the simulation runs.
//!
//! Each switch is stored as an integer code in user input. The resolved form
//! is strongly typed; [`Settings::default`] carries the documented defaults
//! `light_model = 1`, `transp_model = 1`, `phys_model = 1`, `height_model = 1`,
//! `correct_bias = 0`, `calculate_d13c = 0`.

use serde::{Deserialize, Serialize};

pub const LIGHT_MODEL: &str = "light_model";
pub const TRANSP_MODEL: &str = "transp_model";
pub const PHYS_MODEL: &str = "phys_model";
pub const HEIGHT_MODEL: &str = "height_model";
pub const CORRECT_BIAS: &str = "correct_bias";
pub const CALCULATE_D13C: &str = "calculate_d13c";

/// The closed set of recognised setting keys, in documentation order.
pub const SETTING_KEYS: [&str; 6] = [
    LIGHT_MODEL,
    TRANSP_MODEL,
    PHYS_MODEL,
    HEIGHT_MODEL,
    CORRECT_BIAS,
    CALCULATE_D13C,
];

/// Single-species (`Pjs`, code 1) or mixed-species (`Mix`, code 2) variant of
/// a sub-model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelVariant {
    /// 3-PGpjs formulation.
    #[default]
    Pjs,
    /// 3-PGmix formulation.
    Mix,
}

impl ModelVariant {
    pub fn code(self) -> i64 {
        match self {
            ModelVariant::Pjs => 1,
            ModelVariant::Mix => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ModelVariant::Pjs),
            2 => Some(ModelVariant::Mix),
            _ => None,
        }
    }
}

/// Height allometry used by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeightModel {
    /// Power function of DBH (code 1).
    #[default]
    Power,
    /// Exponential function of DBH (code 2).
    Exponential,
}

impl HeightModel {
    pub fn code(self) -> i64 {
        match self {
            HeightModel::Power => 1,
            HeightModel::Exponential => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(HeightModel::Power),
            2 => Some(HeightModel::Exponential),
            _ => None,
        }
    }
}

/// Decode a 0/1 flag.
pub fn flag_from_code(code: i64) -> Option<bool> {
    match code {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// Fully resolved settings. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Settings {
    pub light_model: ModelVariant,
    pub transp_model: ModelVariant,
    pub phys_model: ModelVariant,
    pub height_model: HeightModel,
    /// Apply size-distribution bias correction; needs a size_dist table.
    pub correct_bias: bool,
    /// Compute d13C; needs co2 and d13catm climate columns.
    pub calculate_d13c: bool,
}

impl Settings {
    /// Integer code for a recognised key, `None` for unknown keys.
    pub fn code(&self, key: &str) -> Option<i64> {
        let code = match key {
            LIGHT_MODEL => self.light_model.code(),
            TRANSP_MODEL => self.transp_model.code(),
            PHYS_MODEL => self.phys_model.code(),
            HEIGHT_MODEL => self.height_model.code(),
            CORRECT_BIAS => i64::from(self.correct_bias),
            CALCULATE_D13C => i64::from(self.calculate_d13c),
            _ => return None,
        };
        Some(code)
    }

    /// `(key, code)` pairs for every recognised key.
    pub fn codes(&self) -> [(&'static str, i64); 6] {
        SETTING_KEYS.map(|key| (key, self.code(key).unwrap_or_default()))
    }
}
