//! Module configuration.
//!
//! Loaded once per test run from the host's JSON configuration block and
//! immutable thereafter. Keys are camelCase on the wire (`cssStyle`,
//! `timeWait`, ...) to match how acceptance-test hosts spell them.

use crate::highlight::HighlightStrategy;
use crate::result::{ResaltarError, ResaltarResult};
use crate::style::HighlightStyle;
use serde::Deserialize;
use std::time::Duration;

/// Default dwell time in seconds
pub const DEFAULT_TIME_WAIT: f64 = 1.0;

/// Default driver module name
pub const DEFAULT_MODULE: &str = "WebDriver";

/// Default marker class for class-based and text highlighting
pub const DEFAULT_CLASS_NAME: &str = "resaltar-highlight";

fn default_class_name() -> String {
    DEFAULT_CLASS_NAME.to_string()
}

fn default_time_wait() -> f64 {
    DEFAULT_TIME_WAIT
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

/// Recognized configuration options.
///
/// Unknown keys are ignored; host configuration blocks routinely carry
/// options for other plugins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// CSS properties applied while the highlight is visible
    #[serde(default)]
    pub css_style: HighlightStyle,
    /// Class name used by the class-injection strategy and text markers
    #[serde(default = "default_class_name")]
    pub css_class_name: String,
    /// Dwell duration in seconds (how long the highlight stays visible)
    #[serde(default = "default_time_wait")]
    pub time_wait: f64,
    /// Name of the driver module to delegate to
    #[serde(default = "default_module")]
    pub module: String,
    /// How element highlights are applied
    #[serde(default)]
    pub strategy: HighlightStrategy,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            css_style: HighlightStyle::default(),
            css_class_name: default_class_name(),
            time_wait: DEFAULT_TIME_WAIT,
            module: default_module(),
            strategy: HighlightStrategy::default(),
        }
    }
}

impl ModuleConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a host JSON configuration block.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed JSON or out-of-range values.
    pub fn from_json(json: &str) -> ResaltarResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ResaltarError::InvalidConfig {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the highlight style
    #[must_use]
    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.css_style = style;
        self
    }

    /// Set the marker class name
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.css_class_name = class_name.into();
        self
    }

    /// Set the dwell time in seconds
    #[must_use]
    pub const fn with_time_wait(mut self, seconds: f64) -> Self {
        self.time_wait = seconds;
        self
    }

    /// Set the driver module name
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Set the element-highlight strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: HighlightStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Validate option values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when `timeWait` is negative, not finite, or
    /// not representable as a [`Duration`], or when the class name is empty.
    pub fn validate(&self) -> ResaltarResult<()> {
        if !self.time_wait.is_finite() || self.time_wait < 0.0 {
            return Err(ResaltarError::InvalidConfig {
                message: format!("timeWait must be a non-negative number, got {}", self.time_wait),
            });
        }
        if Duration::try_from_secs_f64(self.time_wait).is_err() {
            return Err(ResaltarError::InvalidConfig {
                message: format!("timeWait {} seconds is out of range", self.time_wait),
            });
        }
        if self.css_class_name.trim().is_empty() {
            return Err(ResaltarError::InvalidConfig {
                message: "cssClassName must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Dwell duration as a [`Duration`].
    ///
    /// Out-of-range values are rejected by [`ModuleConfig::validate`]; an
    /// unvalidated config clamps to zero rather than panicking.
    #[must_use]
    pub fn dwell(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_wait.max(0.0)).unwrap_or(Duration::ZERO)
    }
}
