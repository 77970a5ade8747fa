//! Settings resolution: user codes merged over the documented defaults.

use tracing::{debug, warn};

use tpg_model::settings::{
    CALCULATE_D13C, CORRECT_BIAS, HEIGHT_MODEL, LIGHT_MODEL, PHYS_MODEL, TRANSP_MODEL,
    flag_from_code,
};
use tpg_model::{
    HeightModel, ModelVariant, PrepareError, RawSettings, Result, Settings, TableKind,
    UnknownSettingsMode,
};

/// Settings after merging, with the keys that were not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub settings: Settings,
    /// Unrecognised keys in the user input, in key order.
    pub unknown_keys: Vec<String>,
}

/// Merge `raw` over [`Settings::default`].
///
/// Known keys must carry a valid code (`1`/`2` for model switches, `0`/`1` for
/// flags). Unknown keys are warned about and ignored, or rejected when `mode`
/// is [`UnknownSettingsMode::Reject`].
pub fn resolve_settings(
    raw: Option<&RawSettings>,
    mode: UnknownSettingsMode,
) -> Result<ResolvedSettings> {
    let mut settings = Settings::default();
    let mut unknown_keys = Vec::new();

    let Some(raw) = raw else {
        debug!("no settings supplied, using defaults");
        return Ok(ResolvedSettings {
            settings,
            unknown_keys,
        });
    };

    for (key, code) in raw.iter() {
        match key {
            LIGHT_MODEL => settings.light_model = model_variant(key, code)?,
            TRANSP_MODEL => settings.transp_model = model_variant(key, code)?,
            PHYS_MODEL => settings.phys_model = model_variant(key, code)?,
            HEIGHT_MODEL => {
                settings.height_model =
                    HeightModel::from_code(code).ok_or_else(|| invalid_code(key, code, "1 or 2"))?;
            }
            CORRECT_BIAS => settings.correct_bias = flag(key, code)?,
            CALCULATE_D13C => settings.calculate_d13c = flag(key, code)?,
            _ => match mode {
                UnknownSettingsMode::Reject => {
                    return Err(PrepareError::UnknownSetting {
                        key: key.to_string(),
                    });
                }
                UnknownSettingsMode::Warn => {
                    warn!(key, code, "ignoring unknown setting");
                    unknown_keys.push(key.to_string());
                }
            },
        }
    }

    debug!(?settings, "settings resolved");
    Ok(ResolvedSettings {
        settings,
        unknown_keys,
    })
}

fn model_variant(key: &str, code: i64) -> Result<ModelVariant> {
    ModelVariant::from_code(code).ok_or_else(|| invalid_code(key, code, "1 or 2"))
}

fn flag(key: &str, code: i64) -> Result<bool> {
    flag_from_code(code).ok_or_else(|| invalid_code(key, code, "0 or 1"))
}

fn invalid_code(key: &str, code: i64, expected: &str) -> PrepareError {
    PrepareError::Range {
        table: TableKind::Settings,
        field: key.to_string(),
        value: code.to_string(),
        reason: format!("expected {expected}"),
    }
}
