//! Raw, user-facing scenario tables as handed to input preparation.

use std::collections::BTreeMap;
use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// The input tables of a scenario, used to label errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Site,
    Species,
    Climate,
    Thinning,
    Parameters,
    SizeDist,
    Settings,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Site => "site",
            TableKind::Species => "species",
            TableKind::Climate => "climate",
            TableKind::Thinning => "thinning",
            TableKind::Parameters => "parameters",
            TableKind::SizeDist => "size_dist",
            TableKind::Settings => "settings",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse settings as supplied by the user: option key to integer code.
///
/// Keys are kept verbatim so unrecognised ones can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSettings(BTreeMap<String, i64>);

impl RawSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `code`, replacing any earlier value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, code: i64) -> Self {
        self.0.insert(key.into(), code);
        self
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(key, code)| (key.as_str(), *code))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, i64)> for RawSettings {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Every table of a scenario in its raw DataFrame form.
///
/// `thinning`, `parameters`, `size_dist` and `settings` are optional; `None`
/// means "not supplied" and triggers the documented defaults.
#[derive(Debug, Clone)]
pub struct ScenarioTables {
    pub site: DataFrame,
    pub species: DataFrame,
    pub climate: DataFrame,
    pub thinning: Option<DataFrame>,
    pub parameters: Option<DataFrame>,
    pub size_dist: Option<DataFrame>,
    pub settings: Option<RawSettings>,
}

impl ScenarioTables {
    /// Tables with only the three mandatory inputs.
    pub fn new(site: DataFrame, species: DataFrame, climate: DataFrame) -> Self {
        Self {
            site,
            species,
            climate,
            thinning: None,
            parameters: None,
            size_dist: None,
            settings: None,
        }
    }

    #[must_use]
    pub fn with_thinning(mut self, thinning: DataFrame) -> Self {
        self.thinning = Some(thinning);
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: DataFrame) -> Self {
        self.parameters = Some(parameters);
        self
    }

    #[must_use]
    pub fn with_size_dist(mut self, size_dist: DataFrame) -> Self {
        self.size_dist = Some(size_dist);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RawSettings) -> Self {
        self.settings = Some(settings);
        self
    }
}
