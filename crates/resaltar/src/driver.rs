//! Abstract browser-driver module the facade wraps.
//!
//! [`DriverModule`] is the fixed capability set of the underlying
//! acceptance-testing driver: the seven intercepted assertion/interaction
//! calls plus the low-level script-execution and element-lookup primitives
//! the highlight controller needs. The facade requires an implementation at
//! construction instead of looking a module up by string at call time.
//!
//! # Implementations
//!
//! - [`MockDriver`] - in-crate test double with call recording
//! - `ChromiumDriver` - real CDP control via chromiumoxide (feature `browser`)

use crate::result::{ResaltarError, ResaltarResult};
use crate::script::PageScript;
use crate::selector::{Locator, SelectorInput};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Handle to a DOM element returned by driver lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Selector or backend identifier the element was found by
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Element text content, if any
    pub text_content: Option<String>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text_content: None,
        }
    }

    /// Attach text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }
}

/// The driver-module capability set the facade wraps.
///
/// The assertion methods (`see*`) fail with
/// [`ResaltarError::AssertionFailed`] when the page does not satisfy them;
/// that failure must reach the test unchanged, so the facade never wraps or
/// remaps these results.
#[async_trait]
pub trait DriverModule: Send + Sync {
    /// Assert that `text` is visible on the page (optionally inside
    /// `selector`)
    async fn see(&self, text: &str, selector: Option<&SelectorInput>) -> ResaltarResult<()>;

    /// Assert that an element matching `selector` exists (optionally with
    /// the given attributes)
    async fn see_element(
        &self,
        selector: &SelectorInput,
        attributes: Option<&Value>,
    ) -> ResaltarResult<()>;

    /// Assert that a link with `text` exists (optionally pointing at `url`)
    async fn see_link(&self, text: &str, url: Option<&str>) -> ResaltarResult<()>;

    /// Assert that the form field holds `value`
    async fn see_in_field(&self, field: &SelectorInput, value: &str) -> ResaltarResult<()>;

    /// Click the link or button identified by `link` (optionally scoped to
    /// `context`)
    async fn click(&self, link: &str, context: Option<&SelectorInput>) -> ResaltarResult<()>;

    /// Left-click at the element (with optional pixel offsets)
    async fn click_with_left_button(
        &self,
        locator: Option<&SelectorInput>,
        offset_x: Option<i64>,
        offset_y: Option<i64>,
    ) -> ResaltarResult<()>;

    /// Right-click at the element (with optional pixel offsets)
    async fn click_with_right_button(
        &self,
        locator: Option<&SelectorInput>,
        offset_x: Option<i64>,
        offset_y: Option<i64>,
    ) -> ResaltarResult<()>;

    /// Block for the given duration
    async fn wait(&self, duration: Duration) -> ResaltarResult<()>;

    /// Execute a parameterized script in the page, returning its value
    async fn execute_script(&self, script: &PageScript) -> ResaltarResult<Value>;

    /// Find the first element matching the locator
    async fn find_element(&self, locator: &Locator) -> ResaltarResult<Option<ElementHandle>>;
}

/// One recorded driver invocation, with the original arguments
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    /// `see` was invoked
    See {
        /// Text asserted visible
        text: String,
        /// Optional scoping selector
        selector: Option<SelectorInput>,
    },
    /// `see_element` was invoked
    SeeElement {
        /// Selector asserted present
        selector: SelectorInput,
    },
    /// `see_link` was invoked
    SeeLink {
        /// Link text
        text: String,
        /// Optional target URL
        url: Option<String>,
    },
    /// `see_in_field` was invoked
    SeeInField {
        /// Field locator
        field: SelectorInput,
        /// Expected value
        value: String,
    },
    /// `click` was invoked
    Click {
        /// Link text or locator
        link: String,
        /// Optional context selector
        context: Option<SelectorInput>,
    },
    /// `click_with_left_button` was invoked
    ClickWithLeftButton {
        /// Optional locator
        locator: Option<SelectorInput>,
    },
    /// `click_with_right_button` was invoked
    ClickWithRightButton {
        /// Optional locator
        locator: Option<SelectorInput>,
    },
    /// `wait` was invoked
    Wait {
        /// Requested duration
        duration: Duration,
    },
    /// `execute_script` was invoked
    ExecuteScript {
        /// Script source
        code: String,
        /// Script arguments
        args: Vec<Value>,
    },
    /// `find_element` was invoked
    FindElement {
        /// Resolved locator
        locator: Locator,
    },
}

impl DriverCall {
    /// Short method name, for `was_called`-style checks
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::See { .. } => "see",
            Self::SeeElement { .. } => "see_element",
            Self::SeeLink { .. } => "see_link",
            Self::SeeInField { .. } => "see_in_field",
            Self::Click { .. } => "click",
            Self::ClickWithLeftButton { .. } => "click_with_left_button",
            Self::ClickWithRightButton { .. } => "click_with_right_button",
            Self::Wait { .. } => "wait",
            Self::ExecuteScript { .. } => "execute_script",
            Self::FindElement { .. } => "find_element",
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<DriverCall>,
    script_results: VecDeque<Value>,
    elements: Vec<ElementHandle>,
    fail_scripts: Option<String>,
    fail_assertions: Option<String>,
}

/// Mock driver for unit and integration testing.
///
/// Records every invocation with its original arguments and replays queued
/// script results in FIFO order. Clones share state, so a clone can be
/// handed to the facade while the test keeps inspecting the original.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create a new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock driver state poisoned")
    }

    /// Queue the result for the next `execute_script` call
    pub fn push_script_result(&self, result: Value) {
        self.state().script_results.push_back(result);
    }

    /// Add an element returned by `find_element` when the locator value
    /// matches its id
    pub fn add_element(&self, element: ElementHandle) {
        self.state().elements.push(element);
    }

    /// Make `execute_script` fail once the queued results are exhausted
    pub fn fail_scripts(&self, message: impl Into<String>) {
        self.state().fail_scripts = Some(message.into());
    }

    /// Make every subsequent `see*` assertion fail
    pub fn fail_assertions(&self, message: impl Into<String>) {
        self.state().fail_assertions = Some(message.into());
    }

    /// All recorded invocations, in order
    #[must_use]
    pub fn calls(&self) -> Vec<DriverCall> {
        self.state().calls.clone()
    }

    /// Check whether a method was invoked at least once
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().calls.iter().any(|c| c.name() == method)
    }

    /// The scripts executed so far, as (code, args) pairs
    #[must_use]
    pub fn executed_scripts(&self) -> Vec<(String, Vec<Value>)> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::ExecuteScript { code, args } => Some((code.clone(), args.clone())),
                _ => None,
            })
            .collect()
    }

    /// Total time the driver was asked to wait
    #[must_use]
    pub fn total_wait(&self) -> Duration {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::Wait { duration } => Some(*duration),
                _ => None,
            })
            .sum()
    }

    fn record(&self, call: DriverCall) {
        self.state().calls.push(call);
    }

    fn assertion_result(&self) -> ResaltarResult<()> {
        match &self.state().fail_assertions {
            Some(message) => Err(ResaltarError::AssertionFailed {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DriverModule for MockDriver {
    async fn see(&self, text: &str, selector: Option<&SelectorInput>) -> ResaltarResult<()> {
        self.record(DriverCall::See {
            text: text.to_string(),
            selector: selector.cloned(),
        });
        self.assertion_result()
    }

    async fn see_element(
        &self,
        selector: &SelectorInput,
        _attributes: Option<&Value>,
    ) -> ResaltarResult<()> {
        self.record(DriverCall::SeeElement {
            selector: selector.clone(),
        });
        self.assertion_result()
    }

    async fn see_link(&self, text: &str, url: Option<&str>) -> ResaltarResult<()> {
        self.record(DriverCall::SeeLink {
            text: text.to_string(),
            url: url.map(ToString::to_string),
        });
        self.assertion_result()
    }

    async fn see_in_field(&self, field: &SelectorInput, value: &str) -> ResaltarResult<()> {
        self.record(DriverCall::SeeInField {
            field: field.clone(),
            value: value.to_string(),
        });
        self.assertion_result()
    }

    async fn click(&self, link: &str, context: Option<&SelectorInput>) -> ResaltarResult<()> {
        self.record(DriverCall::Click {
            link: link.to_string(),
            context: context.cloned(),
        });
        Ok(())
    }

    async fn click_with_left_button(
        &self,
        locator: Option<&SelectorInput>,
        _offset_x: Option<i64>,
        _offset_y: Option<i64>,
    ) -> ResaltarResult<()> {
        self.record(DriverCall::ClickWithLeftButton {
            locator: locator.cloned(),
        });
        Ok(())
    }

    async fn click_with_right_button(
        &self,
        locator: Option<&SelectorInput>,
        _offset_x: Option<i64>,
        _offset_y: Option<i64>,
    ) -> ResaltarResult<()> {
        self.record(DriverCall::ClickWithRightButton {
            locator: locator.cloned(),
        });
        Ok(())
    }

    async fn wait(&self, duration: Duration) -> ResaltarResult<()> {
        self.record(DriverCall::Wait { duration });
        Ok(())
    }

    async fn execute_script(&self, script: &PageScript) -> ResaltarResult<Value> {
        self.record(DriverCall::ExecuteScript {
            code: script.code.to_string(),
            args: script.args.clone(),
        });
        let mut state = self.state();
        if let Some(result) = state.script_results.pop_front() {
            return Ok(result);
        }
        if let Some(message) = &state.fail_scripts {
            return Err(ResaltarError::ScriptError {
                message: message.clone(),
            });
        }
        Ok(Value::Null)
    }

    async fn find_element(&self, locator: &Locator) -> ResaltarResult<Option<ElementHandle>> {
        self.record(DriverCall::FindElement {
            locator: locator.clone(),
        });
        Ok(self
            .state()
            .elements
            .iter()
            .find(|e| e.id == locator.value)
            .cloned())
    }
}
