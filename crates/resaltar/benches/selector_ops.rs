//! Selector Resolution Benchmarks
//!
//! Benchmarks for selector input resolution, style rendering, and script
//! assembly.
//!
//! Run with: `cargo bench --bench selector_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jugar_resaltar::{HighlightStyle, PageScript, SelectorInput};

fn bench_selector_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_resolution");

    let inputs = vec![
        ("raw_css", SelectorInput::from(".btn-primary")),
        ("raw_id", SelectorInput::from("#submit-btn")),
        (
            "raw_xpath",
            SelectorInput::from("//a[contains(text(), 'Forgot')]"),
        ),
        ("field_css", SelectorInput::css("div.container > button")),
        ("field_class", SelectorInput::class("login-form")),
        ("field_id", SelectorInput::id("email")),
        ("field_xpath", SelectorInput::xpath("//form//input[1]")),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |bench, inp| {
            bench.iter(|| {
                let locator = black_box(inp).resolve();
                black_box(locator);
            });
        });
    }

    group.finish();
}

fn bench_style_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("style_rendering");

    let styles = vec![
        ("default", HighlightStyle::default()),
        (
            "single",
            HighlightStyle::empty().with("outline", "2px solid red"),
        ),
        (
            "many",
            HighlightStyle::empty()
                .with("background-color", "yellow")
                .with("color", "black")
                .with("outline", "2px solid red")
                .with("border-radius", "3px")
                .with("box-shadow", "0 0 4px rgba(0,0,0,0.4)"),
        ),
    ];

    for (name, style) in styles {
        group.bench_with_input(BenchmarkId::from_parameter(name), &style, |bench, s| {
            bench.iter(|| {
                let declarations = black_box(s).declarations();
                black_box(declarations);
            });
        });
    }

    group.finish();
}

fn bench_script_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("script_assembly");

    let declarations = HighlightStyle::default().declarations();
    let locator = SelectorInput::css(".submit-btn").resolve().unwrap();

    group.bench_function("highlight_element_style", |bench| {
        bench.iter(|| {
            let script =
                PageScript::highlight_element_style(black_box(&locator), black_box(&declarations));
            black_box(script);
        });
    });

    group.bench_function("to_expression", |bench| {
        let script = PageScript::highlight_element_style(&locator, &declarations);
        bench.iter(|| {
            let expression = black_box(&script).to_expression();
            black_box(expression);
        });
    });

    group.bench_function("mark_text", |bench| {
        bench.iter(|| {
            let script =
                PageScript::mark_text(black_box("Forgot Password?"), black_box("resaltar-highlight"));
            black_box(script);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_selector_resolution,
    bench_style_rendering,
    bench_script_assembly
);
criterion_main!(benches);
