//! Highlight lifecycle guarantees: captured state is restored byte for
//! byte, page-side helpers are injected idempotently, and text markers are
//! always cleaned up.

use jugar_resaltar::{
    HighlightOutcome, HighlightStrategy, Highlighter, MemorySink, MockDriver, ModuleConfig,
    PageScript, SelectorInput,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn controller(config: &ModuleConfig) -> (Highlighter, MemorySink) {
    let sink = MemorySink::new();
    let highlighter = Highlighter::from_config(config, Arc::new(sink.clone()));
    (highlighter, sink)
}

fn fast_config() -> ModuleConfig {
    ModuleConfig::default().with_time_wait(0.0)
}

#[tokio::test]
async fn test_restore_carries_captured_style_byte_for_byte() {
    let (highlighter, _sink) = controller(&fast_config());
    let driver = MockDriver::new();
    let original = "color: blue; font-weight: bold;  ";
    driver.push_script_result(Value::Bool(true));
    driver.push_script_result(json!({ "prev": original }));
    driver.push_script_result(Value::Bool(true));

    let outcome = highlighter
        .highlight_element(&driver, &SelectorInput::css(".submit-btn"))
        .await;

    assert!(outcome.is_applied());
    let scripts = driver.executed_scripts();
    assert_eq!(scripts[2].1[2], json!(original));
}

#[tokio::test]
async fn test_restore_removes_attribute_that_was_absent() {
    let (highlighter, _sink) = controller(&fast_config());
    let driver = MockDriver::new();
    driver.push_script_result(Value::Bool(true));
    driver.push_script_result(json!({ "prev": null }));
    driver.push_script_result(Value::Bool(true));

    highlighter
        .highlight_element(&driver, &SelectorInput::id("login"))
        .await;

    assert_eq!(driver.executed_scripts()[2].1[2], Value::Null);
}

#[tokio::test]
async fn test_class_strategy_restores_original_class_list() {
    let config = fast_config().with_strategy(HighlightStrategy::CssClass);
    let (highlighter, _sink) = controller(&config);
    let driver = MockDriver::new();
    driver.push_script_result(Value::Bool(true)); // probe
    driver.push_script_result(Value::Bool(true)); // stylesheet
    driver.push_script_result(json!({ "prev": "btn btn-primary" })); // apply
    driver.push_script_result(Value::Bool(true)); // restore

    let outcome = highlighter
        .highlight_element(&driver, &SelectorInput::css(".btn"))
        .await;

    assert!(outcome.is_applied());
    let scripts = driver.executed_scripts();
    let locator = SelectorInput::css(".btn").resolve().unwrap();
    let expected = PageScript::restore_element_class(&locator, Some("btn btn-primary"));
    assert_eq!(scripts[3].0, expected.code);
    assert_eq!(scripts[3].1, expected.args);
}

#[tokio::test]
async fn test_marker_helpers_use_the_same_injection_script_every_time() {
    let (highlighter, _sink) = controller(&fast_config());
    let driver = MockDriver::new();

    for _ in 0..2 {
        driver.push_script_result(Value::Bool(true)); // probe
        driver.push_script_result(Value::Bool(true)); // library
        driver.push_script_result(Value::Bool(true)); // stylesheet
        driver.push_script_result(json!(1)); // marked
        driver.push_script_result(json!(1)); // unmarked
        let outcome = highlighter.highlight_text(&driver, "Forgot").await;
        assert!(outcome.is_applied());
    }

    // Injection is keyed page-side; the plugin re-sends the same idempotent
    // script rather than tracking injection state of its own
    let scripts = driver.executed_scripts();
    assert_eq!(scripts.len(), 10);
    assert_eq!(scripts[1].0, scripts[6].0);
    assert_eq!(scripts[2].0, scripts[7].0);
    assert_eq!(scripts[2].1, scripts[7].1);
}

#[tokio::test]
async fn test_text_markers_are_removed_after_the_dwell() {
    let (highlighter, _sink) = controller(&fast_config());
    let driver = MockDriver::new();
    driver.push_script_result(Value::Bool(true));
    driver.push_script_result(Value::Bool(true));
    driver.push_script_result(Value::Bool(true));
    driver.push_script_result(json!(3));
    driver.push_script_result(json!(3));

    let outcome = highlighter.highlight_text(&driver, "Welcome").await;

    assert!(outcome.is_applied());
    let scripts = driver.executed_scripts();
    let unmark = PageScript::unmark_text("resaltar-highlight");
    assert_eq!(scripts.last().unwrap().0, unmark.code);
    assert_eq!(scripts.last().unwrap().1, unmark.args);
}

#[tokio::test]
async fn test_failures_are_reported_to_the_sink_not_the_caller() {
    let (highlighter, sink) = controller(&fast_config());
    let driver = MockDriver::new();
    driver.fail_scripts("session closed");

    let outcome = highlighter
        .highlight_element(&driver, &SelectorInput::css(".x"))
        .await;

    assert!(matches!(outcome, HighlightOutcome::Failed { .. }));
    assert!(sink.contains("session closed"));
}

#[tokio::test]
async fn test_custom_style_flows_into_the_applied_declarations() {
    let config = ModuleConfig::from_json(
        r#"{"cssStyle": {"outline": "3px dashed red", "background-color": "pink"}, "timeWait": 0}"#,
    )
    .unwrap();
    let (highlighter, _sink) = controller(&config);
    let driver = MockDriver::new();
    driver.push_script_result(Value::Bool(true));
    driver.push_script_result(json!({ "prev": null }));
    driver.push_script_result(Value::Bool(true));

    highlighter
        .highlight_element(&driver, &SelectorInput::css(".hero"))
        .await;

    // Declaration order follows the configuration document
    assert_eq!(
        driver.executed_scripts()[1].1[2],
        json!("outline: 3px dashed red; background-color: pink;")
    );
}
