//! Highlight controller: apply a visual marker, hold it for the dwell
//! duration, restore the page.
//!
//! Highlighting is best-effort and non-fatal. Every fallible step is caught
//! at this boundary and reported as a [`HighlightOutcome`]; nothing ever
//! propagates to the wrapped driver call. Text matching is a case-sensitive
//! substring match (the deterministic choice where the original's revisions
//! disagreed).
//!
//! State machine per call:
//! `Idle → Resolving → (Found → Highlighting → Waiting → Restoring → Idle)
//! | (NotFound → Idle)`. On any error inside `Resolving..Restoring` the call
//! transitions straight to `Idle` with a diagnostic.

use crate::config::ModuleConfig;
use crate::diagnostics::DiagnosticSink;
use crate::driver::DriverModule;
use crate::script::PageScript;
use crate::selector::{Locator, SelectorInput};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// How element highlights are applied to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightStrategy {
    /// Overwrite the element's inline `style` attribute with the computed
    /// declaration list
    #[default]
    InlineStyle,
    /// Append the configured class name and inject a page stylesheet rule
    /// for it
    CssClass,
}

/// Phase of a highlight operation, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightPhase {
    /// Mapping the input to a locator
    Resolving,
    /// Mutating the page
    Highlighting,
    /// Holding the highlight for the dwell duration
    Waiting,
    /// Restoring the captured page state
    Restoring,
}

impl HighlightPhase {
    /// Phase name used in diagnostic messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resolving => "resolving",
            Self::Highlighting => "highlighting",
            Self::Waiting => "waiting",
            Self::Restoring => "restoring",
        }
    }
}

/// Result of one highlight side effect.
///
/// Internal to the plugin: the facade logs failures and moves on, it never
/// surfaces them through its own return contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// Highlight applied, held for the dwell, and the page restored
    Applied,
    /// Nothing to highlight: unresolvable input, no matching element, or no
    /// DOM scripting capability. Not an error.
    Skipped,
    /// A step failed; logged and swallowed
    Failed {
        /// Phase the failure occurred in
        phase: HighlightPhase,
        /// What went wrong
        reason: String,
    },
}

impl HighlightOutcome {
    /// True when the highlight was applied and restored
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// True when a step failed (as opposed to a clean skip)
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Ephemeral record of a single highlight operation: what was mutated and
/// the original presentation state captured before mutation. Created when
/// the page script reports a match, destroyed once the page is restored -
/// never outlives one facade call.
#[derive(Debug, Clone)]
struct HighlightSession {
    locator: Locator,
    strategy: HighlightStrategy,
    /// Original attribute value; `None` when the attribute was absent
    captured: Option<String>,
}

/// The highlight controller.
///
/// Holds the precomputed style representation and dwell duration, shared
/// read-only across all operations of a test run.
pub struct Highlighter {
    declarations: String,
    rule: String,
    class_name: String,
    strategy: HighlightStrategy,
    dwell: Duration,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("declarations", &self.declarations)
            .field("class_name", &self.class_name)
            .field("strategy", &self.strategy)
            .field("dwell", &self.dwell)
            .finish_non_exhaustive()
    }
}

impl Highlighter {
    /// Build a controller from validated configuration
    #[must_use]
    pub fn from_config(config: &ModuleConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            declarations: config.css_style.declarations(),
            rule: config.css_style.rule(&config.css_class_name),
            class_name: config.css_class_name.clone(),
            strategy: config.strategy,
            dwell: config.dwell(),
            sink,
        }
    }

    /// Configured dwell duration
    #[must_use]
    pub const fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Highlight the first element matching `input`, hold, restore.
    ///
    /// Never fails: every error becomes a logged [`HighlightOutcome`].
    pub async fn highlight_element<D>(&self, driver: &D, input: &SelectorInput) -> HighlightOutcome
    where
        D: DriverModule + ?Sized,
    {
        let Some(locator) = input.resolve() else {
            self.sink.debug("highlight skipped: input resolved to no locator");
            return HighlightOutcome::Skipped;
        };
        self.sink.debug(&format!("[{}] {}", locator.kind, locator.value));

        let outcome = self.element_session(driver, &locator).await;
        self.report(&outcome);
        outcome
    }

    /// Highlight every case-sensitive occurrence of `text`, hold, restore.
    pub async fn highlight_text<D>(&self, driver: &D, text: &str) -> HighlightOutcome
    where
        D: DriverModule + ?Sized,
    {
        if text.is_empty() {
            self.sink.debug("highlight skipped: empty text pattern");
            return HighlightOutcome::Skipped;
        }

        let outcome = self.text_session(driver, text).await;
        self.report(&outcome);
        outcome
    }

    async fn element_session<D>(&self, driver: &D, locator: &Locator) -> HighlightOutcome
    where
        D: DriverModule + ?Sized,
    {
        match self.page_scriptable(driver).await {
            Ok(true) => {}
            Ok(false) => return HighlightOutcome::Skipped,
            Err(outcome) => return outcome,
        }

        let apply = match self.strategy {
            HighlightStrategy::InlineStyle => {
                PageScript::highlight_element_style(locator, &self.declarations)
            }
            HighlightStrategy::CssClass => {
                // The class is meaningless without its stylesheet rule;
                // injection is idempotent per document
                if let Err(outcome) = self.ensure_stylesheet(driver).await {
                    return outcome;
                }
                PageScript::highlight_element_class(locator, &self.class_name)
            }
        };

        let result = match driver.execute_script(&apply).await {
            Ok(result) => result,
            Err(e) => return failed(HighlightPhase::Highlighting, e),
        };

        let session = match captured_state(&result) {
            Ok(Some(captured)) => HighlightSession {
                locator: locator.clone(),
                strategy: self.strategy,
                captured,
            },
            Ok(None) => {
                self.sink
                    .debug(&format!("no element matched {locator}, nothing to highlight"));
                return HighlightOutcome::Skipped;
            }
            Err(reason) => {
                return HighlightOutcome::Failed {
                    phase: HighlightPhase::Highlighting,
                    reason,
                }
            }
        };

        tokio::time::sleep(self.dwell).await;

        self.restore(driver, &session).await
    }

    async fn text_session<D>(&self, driver: &D, text: &str) -> HighlightOutcome
    where
        D: DriverModule + ?Sized,
    {
        match self.page_scriptable(driver).await {
            Ok(true) => {}
            Ok(false) => return HighlightOutcome::Skipped,
            Err(outcome) => return outcome,
        }

        // Marker helpers and their stylesheet are injected lazily, once per
        // document; both scripts probe before touching the page
        if let Err(e) = driver.execute_script(&PageScript::ensure_mark_library()).await {
            return failed(HighlightPhase::Highlighting, e);
        }
        if let Err(outcome) = self.ensure_stylesheet(driver).await {
            return outcome;
        }

        let marked = match driver
            .execute_script(&PageScript::mark_text(text, &self.class_name))
            .await
        {
            Ok(result) => result.as_u64().unwrap_or(0),
            Err(e) => return failed(HighlightPhase::Highlighting, e),
        };
        if marked == 0 {
            self.sink
                .debug(&format!("text {text:?} not found, nothing to highlight"));
            return HighlightOutcome::Skipped;
        }

        tokio::time::sleep(self.dwell).await;

        match driver
            .execute_script(&PageScript::unmark_text(&self.class_name))
            .await
        {
            Ok(_) => HighlightOutcome::Applied,
            Err(e) => failed(HighlightPhase::Restoring, e),
        }
    }

    async fn restore<D>(&self, driver: &D, session: &HighlightSession) -> HighlightOutcome
    where
        D: DriverModule + ?Sized,
    {
        let restore = match session.strategy {
            HighlightStrategy::InlineStyle => PageScript::restore_element_style(
                &session.locator,
                session.captured.as_deref(),
            ),
            HighlightStrategy::CssClass => PageScript::restore_element_class(
                &session.locator,
                session.captured.as_deref(),
            ),
        };
        match driver.execute_script(&restore).await {
            Ok(_) => HighlightOutcome::Applied,
            Err(e) => failed(HighlightPhase::Restoring, e),
        }
    }

    /// DOM scripting capability check; highlighting never runs without it
    async fn page_scriptable<D>(&self, driver: &D) -> Result<bool, HighlightOutcome>
    where
        D: DriverModule + ?Sized,
    {
        match driver.execute_script(&PageScript::probe_dom()).await {
            Ok(Value::Bool(true)) => Ok(true),
            Ok(_) => {
                self.sink
                    .debug("highlight skipped: page has no DOM scripting capability");
                Ok(false)
            }
            Err(e) => Err(failed(HighlightPhase::Resolving, e)),
        }
    }

    async fn ensure_stylesheet<D>(&self, driver: &D) -> Result<(), HighlightOutcome>
    where
        D: DriverModule + ?Sized,
    {
        driver
            .execute_script(&PageScript::ensure_stylesheet(&self.class_name, &self.rule))
            .await
            .map(|_| ())
            .map_err(|e| failed(HighlightPhase::Highlighting, e))
    }

    fn report(&self, outcome: &HighlightOutcome) {
        if let HighlightOutcome::Failed { phase, reason } = outcome {
            self.sink
                .debug(&format!("highlight failed ({}): {reason}", phase.as_str()));
        }
    }
}

fn failed(phase: HighlightPhase, error: crate::result::ResaltarError) -> HighlightOutcome {
    HighlightOutcome::Failed {
        phase,
        reason: error.to_string(),
    }
}

/// Interpret a highlight script result.
///
/// `null` means no element matched. An object carries the captured original
/// attribute in `prev` (`null` when the attribute was absent). Anything
/// else is a malformed result.
fn captured_state(result: &Value) -> Result<Option<Option<String>>, String> {
    match result {
        Value::Null => Ok(None),
        Value::Object(map) => match map.get("prev") {
            None | Some(Value::Null) => Ok(Some(None)),
            Some(Value::String(prev)) => Ok(Some(Some(prev.clone()))),
            Some(other) => Err(format!("unexpected captured attribute value: {other}")),
        },
        other => Err(format!("unexpected highlight script result: {other}")),
    }
}
