//! Result and error types for Resaltar.

use thiserror::Error;

/// Result type for Resaltar operations
pub type ResaltarResult<T> = Result<T, ResaltarError>;

/// Errors that can occur in Resaltar
///
/// Only `MissingModule` and `InvalidConfig` are allowed to fail a test run,
/// and only during setup. Everything a highlight operation can trip over is
/// caught at the controller boundary and reported through the diagnostic
/// sink instead (see [`crate::highlight::HighlightOutcome`]).
#[derive(Debug, Error)]
pub enum ResaltarError {
    /// Required driver module is not active in the host
    #[error("driver module '{name}' is not active. Enable it in the host configuration")]
    MissingModule {
        /// Configured module name
        name: String,
    },

    /// Configuration rejected at load time
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong
        message: String,
    },

    /// Script execution against the page failed
    #[error("script execution failed: {message}")]
    ScriptError {
        /// Error message
        message: String,
    },

    /// Element lookup failed
    #[error("no element matched '{selector}'")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// A driver assertion failed (propagated from the wrapped module)
    #[error("assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Browser launch error (feature `browser`)
    #[error("failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page-level error (feature `browser`)
    #[error("page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Input dispatch error (feature `browser`)
    #[error("input dispatch failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },
}

impl ResaltarError {
    /// True when this error must abort the test run before any test body
    /// executes (setup-time configuration failures).
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingModule { .. } | Self::InvalidConfig { .. }
        )
    }
}
