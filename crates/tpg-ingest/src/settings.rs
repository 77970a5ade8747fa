//! Settings JSON loading.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use tpg_model::RawSettings;

use crate::error::{IngestError, Result};

/// Read a settings file: a JSON object mapping option keys to integer codes.
///
/// Whole-number floats such as `1.0` are accepted as codes. Keys are not
/// checked here; unknown keys are reported during preparation.
pub fn load_settings(path: &Path) -> Result<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::from_io(path, e))?;
    let settings = parse_settings(&content).map_err(|message| IngestError::SettingsParse {
        path: path.to_path_buf(),
        message,
    })?;
    debug!(path = %path.display(), keys = settings.iter().count(), "settings read");
    Ok(settings)
}

fn parse_settings(content: &str) -> std::result::Result<RawSettings, String> {
    let object: BTreeMap<String, Value> =
        serde_json::from_str(content.trim_start_matches('\u{feff}')).map_err(|e| e.to_string())?;
    object
        .into_iter()
        .map(|(key, value)| match code_from_json(&value) {
            Some(code) => Ok((key, code)),
            None => Err(format!("setting '{key}' must be a whole number, found {value}")),
        })
        .collect()
}

fn code_from_json(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(code) = number.as_i64() {
        return Some(code);
    }
    let float = number.as_f64()?;
    let whole = float.is_finite() && float.fract() == 0.0 && float.abs() <= i64::MAX as f64;
    whole.then_some(float as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_integer_codes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"correct_bias": 1, "height_model": 2}}"#).unwrap();
        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.get("correct_bias"), Some(1));
        assert_eq!(settings.get("height_model"), Some(2));
    }

    #[test]
    fn accepts_whole_number_floats() {
        let settings = parse_settings(r#"{"light_model": 1.0, "correct_bias": 0.0}"#).unwrap();
        assert_eq!(settings.get("light_model"), Some(1));
        assert_eq!(settings.get("correct_bias"), Some(0));
    }

    #[test]
    fn rejects_non_integer_codes() {
        assert!(parse_settings(r#"{"correct_bias": "yes"}"#).is_err());
        assert!(parse_settings(r#"{"correct_bias": 0.5}"#).is_err());
        assert!(parse_settings("[1, 2]").is_err());
    }

    #[test]
    fn empty_object_is_valid() {
        assert!(parse_settings("{}").unwrap().is_empty());
    }
}
