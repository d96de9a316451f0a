//! Walkthrough of the highlight plugin against the mock driver.
//!
//! Run with: `cargo run --example highlight_demo`
//!
//! Every intercepted call highlights its target before delegating; the
//! mock driver records the page scripts so the lifecycle is visible on
//! stdout without a real browser. Set `RUST_LOG=resaltar=debug` to see
//! the controller's diagnostics as well.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use jugar_resaltar::{MockDriver, ModuleConfig, Resaltar, SelectorInput, StaticRegistry};
use serde_json::{json, Value};

#[tokio::main]
async fn main() {
    jugar_resaltar::init();

    let config = ModuleConfig::from_json(
        r#"{
            "cssStyle": { "background-color": "yellow", "color": "black" },
            "timeWait": 0.2,
            "module": "WebDriver"
        }"#,
    )
    .unwrap();

    let driver = MockDriver::new();
    let registry = StaticRegistry::new("WebDriver", driver.clone());
    let plugin = Resaltar::from_registry(&registry, config).unwrap();

    plugin.on_test_start().unwrap();

    // A login-page flow: field assertion, link check, click
    queue_element_highlight(&driver);
    plugin
        .see_in_field(&SelectorInput::id("email"), "user@example.com")
        .await
        .unwrap();

    queue_text_highlight(&driver, 1);
    plugin.see_link("Forgot Password?", None).await.unwrap();

    queue_element_highlight(&driver);
    plugin
        .click("Login", Some(&SelectorInput::css(".login-form")))
        .await
        .unwrap();

    plugin.on_test_end().await.unwrap();

    println!("calls made through the facade:");
    for call in driver.calls() {
        println!("  {}", call.name());
    }

    println!("\npage scripts executed while highlighting:");
    for (code, args) in driver.executed_scripts() {
        let head: String = code.chars().take(48).collect();
        println!("  {head}...  args={args:?}");
    }
}

fn queue_element_highlight(driver: &MockDriver) {
    driver.push_script_result(Value::Bool(true)); // page is scriptable
    driver.push_script_result(json!({ "prev": null })); // element found, no prior style
    driver.push_script_result(Value::Bool(true)); // restored
}

fn queue_text_highlight(driver: &MockDriver, matches: u64) {
    driver.push_script_result(Value::Bool(true)); // page is scriptable
    driver.push_script_result(Value::Bool(true)); // marker library installed
    driver.push_script_result(Value::Bool(true)); // stylesheet injected
    driver.push_script_result(json!(matches)); // occurrences marked
    driver.push_script_result(json!(matches)); // markers removed
}
