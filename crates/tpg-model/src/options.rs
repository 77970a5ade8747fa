//! Configuration options for input preparation.

use serde::{Deserialize, Serialize};

/// How unrecognised setting keys are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownSettingsMode {
    /// Log a warning and ignore the key.
    #[default]
    Warn,
    /// Fail preparation with an unknown-setting error.
    Reject,
}

/// Options controlling input preparation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareOptions {
    /// Treatment of setting keys outside the recognised set.
    pub unknown_settings: UnknownSettingsMode,

    /// Log (at debug level) each default substituted for an absent value.
    pub log_defaults: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            unknown_settings: UnknownSettingsMode::Warn,
            log_defaults: true,
        }
    }
}

impl PrepareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that refuse unknown setting keys.
    pub fn strict() -> Self {
        Self {
            unknown_settings: UnknownSettingsMode::Reject,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unknown_settings(mut self, mode: UnknownSettingsMode) -> Self {
        self.unknown_settings = mode;
        self
    }

    #[must_use]
    pub fn with_log_defaults(mut self, enable: bool) -> Self {
        self.log_defaults = enable;
        self
    }
}
