//! Pass-through facade: intercept, highlight, delegate.
//!
//! [`Resaltar`] wraps a [`DriverModule`] supplied at construction and
//! intercepts the seven observed/interactive calls. Each call runs the
//! highlight side effect first (the page shows what is about to be asserted
//! or clicked), then delegates to the driver with the original arguments,
//! returning exactly what the delegate returns. A highlight failure never
//! touches the delegate's outcome; a delegate failure (a failed `see`
//! assertion, say) propagates untouched.
//!
//! Highlight outcomes are reported to the diagnostic sink by the controller
//! itself; the facade discards the returned
//! [`HighlightOutcome`](crate::highlight::HighlightOutcome) without looking
//! at it.

use crate::config::ModuleConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::driver::DriverModule;
use crate::highlight::Highlighter;
use crate::registry::ModuleRegistry;
use crate::result::{ResaltarError, ResaltarResult};
use crate::selector::SelectorInput;
use serde_json::Value;
use std::sync::Arc;

/// The highlight plugin facade.
///
/// Construct with [`Resaltar::new`] when the driver is already in hand, or
/// [`Resaltar::from_registry`] to perform the host-registry lookup and fail
/// fast when the configured module is not active.
pub struct Resaltar<D> {
    driver: D,
    highlighter: Highlighter,
    config: ModuleConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl<D> std::fmt::Debug for Resaltar<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resaltar")
            .field("config", &self.config)
            .field("highlighter", &self.highlighter)
            .finish_non_exhaustive()
    }
}

impl<D: DriverModule> Resaltar<D> {
    /// Wrap `driver` with highlight side effects.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the configuration fails validation.
    pub fn new(driver: D, config: ModuleConfig) -> ResaltarResult<Self> {
        Self::with_sink(driver, config, Arc::new(TracingSink))
    }

    /// Like [`Resaltar::new`], with an explicit diagnostic sink.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the configuration fails validation.
    pub fn with_sink(
        driver: D,
        config: ModuleConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> ResaltarResult<Self> {
        config.validate()?;
        let highlighter = Highlighter::from_config(&config, Arc::clone(&sink));
        Ok(Self {
            driver,
            highlighter,
            config,
            sink,
        })
    }

    /// Fetch the configured driver module from the host registry and wrap
    /// it.
    ///
    /// # Errors
    ///
    /// Returns `MissingModule` when the configured module is not active,
    /// `InvalidConfig` when the configuration fails validation.
    pub fn from_registry<R>(registry: &R, config: ModuleConfig) -> ResaltarResult<Self>
    where
        R: ModuleRegistry<Driver = D>,
    {
        Self::from_registry_with_sink(registry, config, Arc::new(TracingSink))
    }

    /// Like [`Resaltar::from_registry`], with an explicit diagnostic sink.
    ///
    /// # Errors
    ///
    /// Returns `MissingModule` when the configured module is not active,
    /// `InvalidConfig` when the configuration fails validation.
    pub fn from_registry_with_sink<R>(
        registry: &R,
        config: ModuleConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> ResaltarResult<Self>
    where
        R: ModuleRegistry<Driver = D>,
    {
        if !registry.has_module(&config.module) {
            return Err(ResaltarError::MissingModule {
                name: config.module.clone(),
            });
        }
        let driver = registry
            .get_module(&config.module)
            .ok_or_else(|| ResaltarError::MissingModule {
                name: config.module.clone(),
            })?;
        Self::with_sink(driver, config, sink)
    }

    /// The wrapped driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The active configuration
    pub const fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Test-start hook: re-validates configuration before any test body
    /// runs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when validation fails; the only error class
    /// this plugin is allowed to fail a test with.
    pub fn on_test_start(&self) -> ResaltarResult<()> {
        self.config.validate()?;
        self.sink.debug(&format!(
            "resaltar active: module={}, dwell={:?}",
            self.config.module,
            self.config.dwell()
        ));
        Ok(())
    }

    /// Test-end hook: trailing grace period so the last highlight is
    /// watchable.
    ///
    /// # Errors
    ///
    /// Propagates the driver's `wait` error, if any.
    pub async fn on_test_end(&self) -> ResaltarResult<()> {
        self.driver.wait(self.config.dwell()).await
    }

    /// Assert `text` is visible, highlighting its occurrences first
    ///
    /// # Errors
    ///
    /// Exactly the delegate's errors; the highlight cannot fail this call.
    pub async fn see(&self, text: &str, selector: Option<&SelectorInput>) -> ResaltarResult<()> {
        let _ = self.highlighter.highlight_text(&self.driver, text).await;
        self.driver.see(text, selector).await
    }

    /// Assert an element exists, highlighting it first
    ///
    /// # Errors
    ///
    /// Exactly the delegate's errors.
    pub async fn see_element(
        &self,
        selector: &SelectorInput,
        attributes: Option<&Value>,
    ) -> ResaltarResult<()> {
        let _ = self
            .highlighter
            .highlight_element(&self.driver, selector)
            .await;
        self.driver.see_element(selector, attributes).await
    }

    /// Assert a link with `text` exists, highlighting the text first
    ///
    /// # Errors
    ///
    /// Exactly the delegate's errors.
    pub async fn see_link(&self, text: &str, url: Option<&str>) -> ResaltarResult<()> {
        let _ = self.highlighter.highlight_text(&self.driver, text).await;
        self.driver.see_link(text, url).await
    }

    /// Assert a form field holds `value`, highlighting the field first
    ///
    /// # Errors
    ///
    /// Exactly the delegate's errors.
    pub async fn see_in_field(&self, field: &SelectorInput, value: &str) -> ResaltarResult<()> {
        let _ = self
            .highlighter
            .highlight_element(&self.driver, field)
            .await;
        self.driver.see_in_field(field, value).await
    }

    /// Click, highlighting the context element first, with a trailing wait
    ///
    /// # Errors
    ///
    /// Exactly the delegate's errors.
    pub async fn click(&self, link: &str, context: Option<&SelectorInput>) -> ResaltarResult<()> {
        if let Some(context) = context {
            let _ = self
                .highlighter
                .highlight_element(&self.driver, context)
                .await;
        }
        self.driver.click(link, context).await?;
        self.driver.wait(self.config.dwell()).await
    }

    /// Left-click, highlighting the target first, with a trailing wait
    ///
    /// # Errors
    ///
    /// Exactly the delegate's errors.
    pub async fn click_with_left_button(
        &self,
        locator: Option<&SelectorInput>,
        offset_x: Option<i64>,
        offset_y: Option<i64>,
    ) -> ResaltarResult<()> {
        if let Some(locator) = locator {
            let _ = self
                .highlighter
                .highlight_element(&self.driver, locator)
                .await;
        }
        self.driver
            .click_with_left_button(locator, offset_x, offset_y)
            .await?;
        self.driver.wait(self.config.dwell()).await
    }

    /// Right-click, highlighting the target first, with a trailing wait
    ///
    /// # Errors
    ///
    /// Exactly the delegate's errors.
    pub async fn click_with_right_button(
        &self,
        locator: Option<&SelectorInput>,
        offset_x: Option<i64>,
        offset_y: Option<i64>,
    ) -> ResaltarResult<()> {
        if let Some(locator) = locator {
            let _ = self
                .highlighter
                .highlight_element(&self.driver, locator)
                .await;
        }
        self.driver
            .click_with_right_button(locator, offset_x, offset_y)
            .await?;
        self.driver.wait(self.config.dwell()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::driver::{DriverCall, MockDriver};
    use crate::registry::StaticRegistry;

    fn plugin(driver: &MockDriver) -> Resaltar<MockDriver> {
        Resaltar::new(driver.clone(), ModuleConfig::default().with_time_wait(0.0)).unwrap()
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn test_invalid_config_is_rejected() {
            let err = Resaltar::new(
                MockDriver::new(),
                ModuleConfig::default().with_time_wait(f64::NAN),
            )
            .unwrap_err();
            assert!(err.is_fatal());
        }

        #[test]
        fn test_missing_module_fails_fast() {
            let registry = StaticRegistry::new("Playwright", MockDriver::new());
            let err =
                Resaltar::from_registry(&registry, ModuleConfig::default()).unwrap_err();
            assert!(matches!(err, ResaltarError::MissingModule { name } if name == "WebDriver"));
        }

        #[test]
        fn test_registry_lookup_honors_configured_name() {
            let registry = StaticRegistry::new("Playwright", MockDriver::new());
            let config = ModuleConfig::default().with_module("Playwright");
            assert!(Resaltar::from_registry(&registry, config).is_ok());
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn test_on_test_start_succeeds_with_valid_config() {
            let driver = MockDriver::new();
            plugin(&driver).on_test_start().unwrap();
        }

        #[tokio::test]
        async fn test_on_test_end_issues_trailing_wait() {
            let driver = MockDriver::new();
            let plugin = Resaltar::new(
                driver.clone(),
                ModuleConfig::default().with_time_wait(2.0),
            )
            .unwrap();

            plugin.on_test_end().await.unwrap();
            assert_eq!(driver.total_wait(), std::time::Duration::from_secs(2));
        }
    }

    mod delegation_tests {
        use super::*;

        #[tokio::test]
        async fn test_see_forwards_original_arguments() {
            let driver = MockDriver::new();
            let plugin = plugin(&driver);
            let scope = SelectorInput::css(".nav");

            plugin.see("Welcome", Some(&scope)).await.unwrap();

            let sees: Vec<_> = driver
                .calls()
                .into_iter()
                .filter(|c| matches!(c, DriverCall::See { .. }))
                .collect();
            assert_eq!(
                sees,
                vec![DriverCall::See {
                    text: "Welcome".to_string(),
                    selector: Some(scope),
                }]
            );
        }

        #[tokio::test]
        async fn test_assertion_failure_propagates_untouched() {
            let driver = MockDriver::new();
            driver.fail_assertions("expected text not found");
            let plugin = plugin(&driver);

            let err = plugin.see("missing", None).await.unwrap_err();
            assert!(matches!(err, ResaltarError::AssertionFailed { .. }));
        }

        #[tokio::test]
        async fn test_highlight_failure_does_not_block_delegate() {
            let driver = MockDriver::new();
            driver.fail_scripts("no page");
            let plugin = plugin(&driver);

            plugin
                .see_element(&SelectorInput::css(".submit-btn"), None)
                .await
                .unwrap();

            assert!(driver.was_called("see_element"));
        }

        #[tokio::test]
        async fn test_click_issues_trailing_wait_after_delegation() {
            let driver = MockDriver::new();
            let plugin = Resaltar::new(
                driver.clone(),
                ModuleConfig::default().with_time_wait(1.5),
            )
            .unwrap();

            plugin.click("Login", None).await.unwrap();

            let calls = driver.calls();
            let click_pos = calls.iter().position(|c| c.name() == "click").unwrap();
            let wait_pos = calls.iter().position(|c| c.name() == "wait").unwrap();
            assert!(wait_pos > click_pos);
            assert_eq!(driver.total_wait(), std::time::Duration::from_millis(1500));
        }

        #[tokio::test]
        async fn test_click_without_context_skips_highlighting() {
            let driver = MockDriver::new();
            let plugin = plugin(&driver);

            plugin.click("Login", None).await.unwrap();

            assert!(driver.executed_scripts().is_empty());
        }

        #[tokio::test]
        async fn test_suppressed_failures_reach_the_sink() {
            let driver = MockDriver::new();
            driver.fail_scripts("boom");
            let sink = MemorySink::new();
            let plugin = Resaltar::with_sink(
                driver.clone(),
                ModuleConfig::default().with_time_wait(0.0),
                Arc::new(sink.clone()),
            )
            .unwrap();

            plugin
                .see_in_field(&SelectorInput::id("email"), "a@b.c")
                .await
                .unwrap();

            assert!(sink.contains("highlight failed"));
            assert!(driver.was_called("see_in_field"));
        }
    }
}
