//! Real browser control via the Chrome DevTools Protocol.
//!
//! [`ChromiumDriver`] implements [`DriverModule`] over chromiumoxide,
//! so the facade can delegate to an actual page instead of a host
//! framework's driver. Assertions and interactions are evaluated in the
//! page itself; scripts receive their arguments through
//! [`PageScript::to_expression`], which applies the JSON-serialized
//! argument vector to the script function.
//!
//! Compiled only with the `browser` feature.

use crate::driver::{DriverModule, ElementHandle};
use crate::result::{ResaltarError, ResaltarResult};
use crate::script::PageScript;
use crate::selector::{Locator, SelectorInput};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Describe the first element matching a locator: `null` or `{tag, text}`
const DESCRIBE_ELEMENT: &str = "function(kind, value) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 var el = find(kind, value);\
 if (!el) { return null; }\
 return { tag: el.tagName.toLowerCase(), text: el.textContent };\
 }";

/// Case-sensitive text presence, optionally scoped to a locator
const SEE_TEXT: &str = "function(text, kind, value) {\
 var root = document.body;\
 if (kind) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 root = find(kind, value);\
 if (!root) { return false; }\
 }\
 return (root.textContent || '').indexOf(text) >= 0;\
 }";

/// Anchor with matching text (and, when given, href substring)
const SEE_LINK: &str = "function(text, url) {\
 var links = document.querySelectorAll('a');\
 for (var i = 0; i < links.length; i += 1) {\
 var a = links[i];\
 if ((a.textContent || '').indexOf(text) < 0) { continue; }\
 if (url && (a.getAttribute('href') || '').indexOf(url) < 0) { continue; }\
 return true;\
 }\
 return false;\
 }";

/// Current value of the first matching form field: `null` or `{value}`
const FIELD_VALUE: &str = "function(kind, value) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 var el = find(kind, value);\
 if (!el) { return null; }\
 return { value: el.value !== undefined ? el.value : el.textContent };\
 }";

/// Click the first link or button whose text contains `text`
const CLICK_BY_TEXT: &str = "function(text) {\
 var candidates = document.querySelectorAll('a, button, input[type=submit]');\
 for (var i = 0; i < candidates.length; i += 1) {\
 var el = candidates[i];\
 var label = el.textContent || el.value || '';\
 if (label.indexOf(text) >= 0) { el.click(); return true; }\
 }\
 return false;\
 }";

/// Dispatch a mouse event at the matched element (button 0 = left, 2 =
/// right), offset in pixels from its top-left corner
const CLICK_MOUSE: &str = "function(kind, value, button, offsetX, offsetY) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 var el = find(kind, value);\
 if (!el) { return false; }\
 var rect = el.getBoundingClientRect();\
 var ev = new MouseEvent(button === 2 ? 'contextmenu' : 'click', {\
 bubbles: true,\
 cancelable: true,\
 button: button,\
 clientX: rect.left + (offsetX || 0),\
 clientY: rect.top + (offsetY || 0)\
 });\
 el.dispatchEvent(ev);\
 return true;\
 }";

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct ChromiumConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            chromium_path: None,
        }
    }
}

impl ChromiumConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }
}

/// CDP-backed driver module
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: Arc<Mutex<CdpPage>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch a browser and open a blank page.
    ///
    /// # Errors
    ///
    /// Returns `BrowserLaunchError` when the browser cannot be started.
    pub async fn launch(config: ChromiumConfig) -> ResaltarResult<Self> {
        let mut builder = CdpConfig::builder();

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| ResaltarError::BrowserLaunchError { message: e })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ResaltarError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

        // Drive the CDP event loop until the connection drops
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ResaltarError::PageError {
                message: e.to_string(),
            })?;

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page: Arc::new(Mutex::new(page)),
            handle,
        })
    }

    /// Navigate the page to `url`.
    ///
    /// # Errors
    ///
    /// Returns `PageError` when navigation fails.
    pub async fn goto(&self, url: &str) -> ResaltarResult<()> {
        let page = self.page.lock().await;
        page.goto(url).await.map_err(|e| ResaltarError::PageError {
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Close the browser.
    ///
    /// # Errors
    ///
    /// Returns `BrowserLaunchError` when shutdown fails.
    pub async fn close(&self) -> ResaltarResult<()> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| ResaltarError::BrowserLaunchError {
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn eval(&self, script: &PageScript) -> ResaltarResult<Value> {
        let page = self.page.lock().await;
        let result =
            page.evaluate(script.to_expression())
                .await
                .map_err(|e| ResaltarError::ScriptError {
                    message: e.to_string(),
                })?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    fn locator_args(locator: &Locator) -> (Value, Value) {
        (
            Value::String(locator.kind.as_str().to_string()),
            Value::String(locator.value.clone()),
        )
    }
}

#[async_trait]
impl DriverModule for ChromiumDriver {
    async fn see(&self, text: &str, selector: Option<&SelectorInput>) -> ResaltarResult<()> {
        let mut script = PageScript::new(SEE_TEXT).arg(text);
        match selector.and_then(SelectorInput::resolve) {
            Some(locator) => {
                let (kind, value) = Self::locator_args(&locator);
                script = script.arg(kind).arg(value);
            }
            None => {
                script = script.arg(Value::Null).arg(Value::Null);
            }
        }
        if self.eval(&script).await? == Value::Bool(true) {
            Ok(())
        } else {
            Err(ResaltarError::AssertionFailed {
                message: format!("text {text:?} not visible on page"),
            })
        }
    }

    async fn see_element(
        &self,
        selector: &SelectorInput,
        _attributes: Option<&Value>,
    ) -> ResaltarResult<()> {
        let locator = selector.resolve().ok_or_else(|| ResaltarError::AssertionFailed {
            message: "selector resolved to no locator".to_string(),
        })?;
        match self.find_element(&locator).await? {
            Some(_) => Ok(()),
            None => Err(ResaltarError::AssertionFailed {
                message: format!("no element matched {locator}"),
            }),
        }
    }

    async fn see_link(&self, text: &str, url: Option<&str>) -> ResaltarResult<()> {
        let script = PageScript::new(SEE_LINK)
            .arg(text)
            .arg(url.map_or(Value::Null, |u| Value::String(u.to_string())));
        if self.eval(&script).await? == Value::Bool(true) {
            Ok(())
        } else {
            Err(ResaltarError::AssertionFailed {
                message: format!("no link with text {text:?}"),
            })
        }
    }

    async fn see_in_field(&self, field: &SelectorInput, value: &str) -> ResaltarResult<()> {
        let locator = field.resolve().ok_or_else(|| ResaltarError::AssertionFailed {
            message: "field resolved to no locator".to_string(),
        })?;
        let (kind, sel) = Self::locator_args(&locator);
        let result = self
            .eval(&PageScript::new(FIELD_VALUE).arg(kind).arg(sel))
            .await?;
        let actual = result
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| ResaltarError::AssertionFailed {
                message: format!("no field matched {locator}"),
            })?;
        if actual == value {
            Ok(())
        } else {
            Err(ResaltarError::AssertionFailed {
                message: format!("field {locator} holds {actual:?}, expected {value:?}"),
            })
        }
    }

    async fn click(&self, link: &str, context: Option<&SelectorInput>) -> ResaltarResult<()> {
        // With a context locator, click the context element itself;
        // otherwise treat `link` as visible link/button text
        if let Some(locator) = context.and_then(SelectorInput::resolve) {
            let (kind, sel) = Self::locator_args(&locator);
            let clicked = self
                .eval(&PageScript::new(CLICK_MOUSE).arg(kind).arg(sel).arg(0).arg(0).arg(0))
                .await?;
            if clicked == Value::Bool(true) {
                return Ok(());
            }
            return Err(ResaltarError::ElementNotFound {
                selector: locator.value,
            });
        }
        let clicked = self.eval(&PageScript::new(CLICK_BY_TEXT).arg(link)).await?;
        if clicked == Value::Bool(true) {
            Ok(())
        } else {
            Err(ResaltarError::ElementNotFound {
                selector: link.to_string(),
            })
        }
    }

    async fn click_with_left_button(
        &self,
        locator: Option<&SelectorInput>,
        offset_x: Option<i64>,
        offset_y: Option<i64>,
    ) -> ResaltarResult<()> {
        self.mouse_click(locator, 0, offset_x, offset_y).await
    }

    async fn click_with_right_button(
        &self,
        locator: Option<&SelectorInput>,
        offset_x: Option<i64>,
        offset_y: Option<i64>,
    ) -> ResaltarResult<()> {
        self.mouse_click(locator, 2, offset_x, offset_y).await
    }

    async fn wait(&self, duration: Duration) -> ResaltarResult<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn execute_script(&self, script: &PageScript) -> ResaltarResult<Value> {
        self.eval(script).await
    }

    async fn find_element(&self, locator: &Locator) -> ResaltarResult<Option<ElementHandle>> {
        let (kind, sel) = Self::locator_args(locator);
        let result = self
            .eval(&PageScript::new(DESCRIBE_ELEMENT).arg(kind).arg(sel))
            .await?;
        match result {
            Value::Null => Ok(None),
            Value::Object(map) => {
                let tag = map
                    .get("tag")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                let mut handle = ElementHandle::new(locator.value.clone(), tag);
                if let Some(text) = map.get("text").and_then(Value::as_str) {
                    handle = handle.with_text(text);
                }
                Ok(Some(handle))
            }
            other => Err(ResaltarError::ScriptError {
                message: format!("unexpected element description: {other}"),
            }),
        }
    }
}

impl ChromiumDriver {
    async fn mouse_click(
        &self,
        locator: Option<&SelectorInput>,
        button: i64,
        offset_x: Option<i64>,
        offset_y: Option<i64>,
    ) -> ResaltarResult<()> {
        let locator = locator
            .and_then(SelectorInput::resolve)
            .ok_or_else(|| ResaltarError::InputError {
                message: "mouse click requires a resolvable locator".to_string(),
            })?;
        let (kind, sel) = Self::locator_args(&locator);
        let clicked = self
            .eval(
                &PageScript::new(CLICK_MOUSE)
                    .arg(kind)
                    .arg(sel)
                    .arg(button)
                    .arg(offset_x.unwrap_or(0))
                    .arg(offset_y.unwrap_or(0)),
            )
            .await?;
        if clicked == Value::Bool(true) {
            Ok(())
        } else {
            Err(ResaltarError::ElementNotFound {
                selector: locator.value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_sandboxed_headless() {
        let config = ChromiumConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert!(config.chromium_path.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ChromiumConfig::default()
            .with_headless(false)
            .with_no_sandbox()
            .with_chromium_path("/usr/bin/chromium");
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[test]
    fn test_driver_scripts_are_function_declarations() {
        for code in [DESCRIBE_ELEMENT, SEE_TEXT, SEE_LINK, FIELD_VALUE, CLICK_BY_TEXT, CLICK_MOUSE]
        {
            assert!(code.starts_with("function"));
        }
    }
}
