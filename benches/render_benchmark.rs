//! Benchmarks for unwiki rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks render synthetic articles of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unwiki::tex::TexInterpreter;
use unwiki::RenderOptions;

/// Creates a synthetic article with the given number of sections.
fn create_test_article(section_count: usize) -> String {
    let mut html = String::from("<html><head><title>Benchmark</title></head><body>");

    for i in 0..section_count {
        html.push_str(&format!("<h2>Section {}</h2>", i + 1));
        html.push_str(
            "<p>The <b>quick</b> brown fox jumps over the <i>lazy</i> dog, \
             while the clocks were striking thirteen on a bright cold day.</p>",
        );
        html.push_str(
            r#"<p>Energy is <span typeof="mw:Extension/math" data-mw='{"body":{"extsrc":"E = mc^2"}}'></span> in the rest frame.</p>"#,
        );
        html.push_str("<ul><li>first point<ol><li>detail</li><li>more</li></ol></li><li>second point</li></ul>");
        html.push_str("<dl><dt>Term</dt><dd>definition with a few words</dd></dl>");
        html.push_str(r#"<div style="display:none"><p>hidden</p></div>"#);
    }

    html.push_str("</body></html>");
    html
}

/// Benchmark rendering at various sizes.
fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    let options = RenderOptions::default();

    for section_count in [1, 10, 50].iter() {
        let html = create_test_article(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| unwiki::to_text(black_box(&html), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the TeX interpreter on a mixed expression.
fn bench_tex(c: &mut Criterion) {
    let source = r"\sum_{i=1}^{n} \frac{\alpha_i}{\sqrt{x^2 + y^2}} \leq \int_0^\infty e^{-t} \, dt";

    c.bench_function("tex_interpret", |b| {
        let mut tex = TexInterpreter::new();
        b.iter(|| tex.interpret(black_box(source)));
    });
}

/// Benchmark parsing alone.
fn bench_parsing(c: &mut Criterion) {
    let html = create_test_article(10);

    c.bench_function("parse_html", |b| {
        b.iter(|| unwiki::parse_html(black_box(&html)));
    });
}

criterion_group!(benches, bench_rendering, bench_tex, bench_parsing);
criterion_main!(benches);
