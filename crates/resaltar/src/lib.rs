//! Resaltar: Visual Highlighting for Browser Acceptance Tests
//!
//! Resaltar (Spanish: "to highlight") wraps a driver module used by an
//! acceptance-test host and makes each assertion and interaction visible
//! on the page before it runs. The target element or text is styled,
//! left on screen for a configurable dwell, restored, and only then is
//! the original call delegated to the underlying driver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    RESALTAR Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Facade     │    │ Highlight  │    │ Driver     │            │
//! │   │ (Resaltar) │───►│ Controller │───►│ Module     │            │
//! │   │            │    │            │    │ (browser)  │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                 │                                      │
//! │         │           ┌────────────┐                               │
//! │         └──────────►│ Selector   │                               │
//! │                     │ Resolver   │                               │
//! │                     └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Highlighting is best-effort: a failed highlight is logged and the
//! wrapped call still runs. Assertion and interaction errors from the
//! driver propagate unchanged.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod config;
mod diagnostics;
#[allow(clippy::must_use_candidate)]
mod driver;
mod facade;
mod highlight;
mod registry;
mod result;
#[allow(clippy::must_use_candidate)]
mod script;
mod selector;
mod style;

#[cfg(feature = "browser")]
mod chromium;

#[cfg(feature = "browser")]
pub use chromium::{ChromiumConfig, ChromiumDriver};
pub use config::{ModuleConfig, DEFAULT_CLASS_NAME, DEFAULT_MODULE, DEFAULT_TIME_WAIT};
pub use diagnostics::{init, DiagnosticSink, MemorySink, TracingSink};
pub use driver::{DriverCall, DriverModule, ElementHandle, MockDriver};
pub use facade::Resaltar;
pub use highlight::{HighlightOutcome, HighlightPhase, HighlightStrategy, Highlighter};
pub use registry::{ModuleRegistry, StaticRegistry};
pub use result::{ResaltarError, ResaltarResult};
pub use script::PageScript;
pub use selector::{Locator, LocatorKind, SelectorFields, SelectorInput};
pub use style::HighlightStyle;
