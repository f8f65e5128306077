//! Integration tests for math rendering.

use unwiki::tex::{collapse_rows, TexInterpreter};
use unwiki::{to_text, RenderOptions};

fn math(source: &str, display: bool) -> String {
    let payload = serde_json::json!({
        "attrs": { "display": if display { "block" } else { "inline" } },
        "body": { "extsrc": source },
    });
    format!(
        r#"<span typeof="mw:Extension/math" data-mw='{}'>fallback image</span>"#,
        payload.to_string().replace('\'', "&#39;")
    )
}

#[test]
fn test_inline_math_in_paragraph() {
    let html = format!("<p>Since {} for all x.</p>", math(r"\forall x \in \mathbb{R}", false));
    let text = to_text(&html, &RenderOptions::default()).unwrap();
    assert_eq!(text, "Since ∀ x ∈ ℝ for all x.\n\n");
}

#[test]
fn test_display_math_on_own_indented_line() {
    let html = format!("<p>Euler:</p><p>{}</p><p>done</p>", math(r"e^{i\pi}+1=0", true));
    let text = to_text(&html, &RenderOptions::default()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.contains(&"  e^{iπ}+1=0"), "{:?}", text);
    assert!(text.starts_with("Euler:\n"));
    assert!(text.ends_with("done\n\n"));
}

#[test]
fn test_aligned_environment_renders_one_row_per_line() {
    let source = r"\begin{align*} x &= \frac{1}{2} \\ y &= \sqrt{2} \end{align*}";
    let html = format!("<p>{}</p>", math(source, false));
    let text = to_text(&html, &RenderOptions::default()).unwrap();
    let rows: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(rows, vec!["  x = 1/2", "  y = √(2)"]);
}

#[test]
fn test_display_math_group_spanning_lines() {
    let html = format!("<p>{}</p>", math("\\frac{a +\n b}{2}", true));
    let text = to_text(&html, &RenderOptions::default()).unwrap();
    assert_eq!(text, "  (a + b)/(2)\n");
}

#[test]
fn test_escaped_underscore_in_math() {
    let html = format!("<p>{}</p>", math(r"\mathrm{snake\_case}", false));
    let text = to_text(&html, &RenderOptions::default()).unwrap();
    assert!(text.contains("snake_case"), "{:?}", text);
}

#[test]
fn test_math_never_leaves_fallback_content() {
    let html = format!("<p>{}</p>", math(r"\alpha", false));
    let text = to_text(&html, &RenderOptions::default()).unwrap();
    assert!(!text.contains("fallback"));
    assert_eq!(text, "α\n\n");
}

#[test]
fn test_unknown_macros_are_reported_once() {
    let mut tex = TexInterpreter::new();
    for _ in 0..3 {
        tex.interpret(r"\quux{sgn}(x) + \foobar[2]{y} + \alpha");
    }
    let unknown: Vec<&str> = tex.unknown_macros().collect();
    assert_eq!(unknown, vec!["foobar", "quux"]);
}

#[test]
fn test_interpretation_always_terminates() {
    let mut tex = TexInterpreter::new();
    for source in [
        r"\frac{",
        r"\sqrt[",
        r"\sqrt[3",
        r"{{{{",
        r"}}}}",
        r"\\\\\\",
        r"\begin{align}",
        r"\end{align}",
        "^_^_",
        r"\left( \right",
        "",
    ] {
        let out = tex.render(source, false);
        assert!(out.rows.len() <= 1, "{:?}", source);
    }
}

#[test]
fn test_greek_and_operators() {
    let mut tex = TexInterpreter::new();
    assert_eq!(
        tex.interpret(r"\Delta x \cdot \lambda \neq \infty"),
        "Δ x ⋅ λ ≠ ∞"
    );
}

#[test]
fn test_collapse_rows_keeps_escaped_ampersand() {
    assert_eq!(collapse_rows(r"a & b \\ c"), "a  b \n c");
    assert_eq!(collapse_rows(r"R\&D"), r"R\&D");
}
