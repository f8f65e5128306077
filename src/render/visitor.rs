//! Tree-walking renderer.
//!
//! The [`Visitor`] classifies every element (see [`classify`]) and renders
//! it into a [`TextSink`]. Inline content that must be measured or
//! transformed before it is written (headings, sub/superscripts, term labels,
//! footnote markers) is flattened through a [`Collector`] first.
//!
//! # Example
//!
//! ```
//! use unwiki::parser::parse_html;
//! use unwiki::render::{Formatter, RenderOptions, TextSink, Visitor};
//!
//! let doc = parse_html("<p>Hello <b>world</b></p>");
//! let options = RenderOptions::default();
//! let mut visitor = Visitor::new(&options);
//! let mut out = Formatter::new(Vec::new(), &options);
//! visitor.visit(&doc.body(), &mut out).unwrap();
//! out.flush().unwrap();
//!
//! assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "Hello world\n\n");
//! ```

use std::collections::BTreeSet;

use crate::error::Result;
use crate::model::{Node, NodeKind};
use crate::tex::TexInterpreter;

use super::classify::{self, classify, Handler, ListKind, MathSource};
use super::language::{default_direction, POP_DIRECTIONAL_ISOLATE};
use super::normalize::{collapse_whitespace, is_breaking_space};
use super::scripts::{to_subscript, to_superscript};
use super::{Collector, Direction, RenderOptions, TextNormalizer, TextSink};

/// Unordered list glyphs, cycling with nesting depth.
const BULLETS: [&str; 3] = ["•", "◦", "▪"];

/// State of the innermost list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ListInfo {
    kind: Option<ListKind>,
    depth: usize,
    counter: usize,
    saw_term: bool,
}

/// Scoped rendering context, saved and restored around switches.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VisitorContext {
    language: String,
    direction: Direction,
    list: ListInfo,
}

/// Renders document nodes into a [`TextSink`].
pub struct Visitor {
    options: RenderOptions,
    normalizer: TextNormalizer,
    tex: TexInterpreter,
    context: VisitorContext,
    base_direction: Direction,
    used_languages: BTreeSet<String>,
    title: Option<String>,
    grouped_images: usize,
}

impl Visitor {
    /// Create a visitor starting in the configured default language.
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            options: options.clone(),
            normalizer: TextNormalizer::new(),
            tex: TexInterpreter::new(),
            context: VisitorContext {
                language: options.default_language.clone(),
                direction: options.default_direction,
                list: ListInfo::default(),
            },
            base_direction: options.default_direction,
            used_languages: BTreeSet::new(),
            title: None,
            grouped_images: 0,
        }
    }

    /// Get the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Set the base language of the next article.
    ///
    /// The direction is taken from the language table.
    pub fn set_language(&mut self, lang: &str) {
        let direction = default_direction(lang);
        self.context.language = lang.to_string();
        self.context.direction = direction;
        self.base_direction = direction;
        self.used_languages.insert(lang.to_string());
    }

    /// Language currently in effect.
    pub fn language(&self) -> &str {
        &self.context.language
    }

    /// Direction currently in effect.
    pub fn direction(&self) -> Direction {
        self.context.direction
    }

    /// Every language switched to so far, sorted.
    pub fn used_languages(&self) -> &BTreeSet<String> {
        &self.used_languages
    }

    /// Title resolved from the last visited document body.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of image/caption pairs found in grouped-image containers.
    pub fn grouped_images(&self) -> usize {
        self.grouped_images
    }

    /// The math interpreter, for its unknown-macro report.
    pub fn tex(&self) -> &TexInterpreter {
        &self.tex
    }

    /// Render a node and its subtree.
    pub fn visit(&mut self, node: &Node, sink: &mut dyn TextSink) -> Result<()> {
        match node.kind() {
            NodeKind::Element => self.visit_element(node, sink),
            NodeKind::Text => self.visit_text(node, sink),
            NodeKind::Document => self.visit_children(node, sink),
            NodeKind::Other => Ok(()),
        }
    }

    fn visit_children(&mut self, node: &Node, sink: &mut dyn TextSink) -> Result<()> {
        for child in node.children() {
            self.visit(&child, sink)?;
        }
        Ok(())
    }

    /// Run `f` and restore the context afterwards.
    fn scoped<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let saved = self.context.clone();
        let result = f(self);
        self.context = saved;
        result
    }

    /// Render the children of `node` into a single flattened line.
    fn flatten(&mut self, node: &Node) -> Result<String> {
        let mut collector = Collector::new();
        self.visit_children(node, &mut collector)?;
        Ok(collector.finish())
    }

    fn visit_text(&mut self, node: &Node, sink: &mut dyn TextSink) -> Result<()> {
        let Some(raw) = node.text() else {
            return Ok(());
        };
        let text = self.normalizer.normalize(&raw);
        if text.is_empty() {
            return Ok(());
        }

        let direction = self.context.direction;
        if !self.options.bidi_isolation || direction == self.base_direction {
            return sink.write(&text);
        }

        let inner = text.trim_matches(is_breaking_space);
        if inner.is_empty() {
            return sink.write(&text);
        }
        let start = text.len() - text.trim_start_matches(is_breaking_space).len();
        let end = start + inner.len();
        sink.write(&format!(
            "{}{}{}{}{}",
            &text[..start],
            direction.isolate(),
            inner,
            POP_DIRECTIONAL_ISOLATE,
            &text[end..]
        ))
    }

    fn visit_element(&mut self, node: &Node, sink: &mut dyn TextSink) -> Result<()> {
        let handler = classify(node, &self.context.language, self.context.direction);
        match handler {
            Handler::Skip => Ok(()),
            Handler::Language(lang) => self.scoped(|v| {
                v.context.direction = default_direction(&lang);
                v.used_languages.insert(lang.clone());
                v.context.language = lang;
                v.visit_element(node, sink)
            }),
            Handler::Direction(direction) => self.scoped(|v| {
                v.context.direction = direction;
                v.visit_element(node, sink)
            }),
            Handler::Math(math) => self.visit_math(&math, false, sink),
            Handler::Footnotes => self.visit_footnotes(node, sink),
            Handler::MultiImage => {
                self.visit_multi_image(node);
                Ok(())
            }
            Handler::Body => {
                self.title = resolve_title(node);
                if let Some(title) = &self.title {
                    log::debug!("Resolved document title: {}", title);
                }
                self.visit_children(node, sink)
            }
            Handler::Paragraph => {
                sink.paragraph_break()?;
                self.visit_children(node, sink)?;
                sink.paragraph_break()
            }
            Handler::Heading(level) => self.visit_heading(node, level, sink),
            Handler::Subscript => {
                let text = self.flatten(node)?;
                sink.write(&to_subscript(&text).unwrap_or(text))
            }
            Handler::Superscript => {
                let text = self.flatten(node)?;
                sink.write(&to_superscript(&text).unwrap_or(text))
            }
            Handler::LineBreak => sink.line_break(),
            Handler::List(kind) => self.visit_list(node, kind, sink),
            Handler::ListItem => self.visit_list_item(node, sink),
            Handler::DescriptionList => self.visit_description_list(node, sink),
            Handler::Quotation => {
                sink.indent(None)?;
                self.visit_children(node, sink)?;
                sink.dedent()
            }
            Handler::Block => {
                sink.line_break()?;
                self.visit_children(node, sink)?;
                sink.line_break()
            }
            Handler::Children => self.visit_children(node, sink),
        }
    }

    fn visit_heading(&mut self, node: &Node, level: u8, sink: &mut dyn TextSink) -> Result<()> {
        let level = if self.options.has_chapters {
            level + 1
        } else {
            level
        };
        if self.options.single_item && level == 1 {
            log::trace!("Suppressing heading that repeats the collection title");
            return Ok(());
        }
        let text = self.flatten(node)?;
        sink.paragraph_break()?;
        sink.write(&text)?;
        sink.paragraph_break()
    }

    fn visit_math(
        &mut self,
        math: &MathSource,
        force_display: bool,
        sink: &mut dyn TextSink,
    ) -> Result<()> {
        let text = self.tex.render(&math.source, math.display || force_display);
        if !text.display {
            return sink.write(&text.rows.concat());
        }
        sink.indent(None)?;
        for row in &text.rows {
            sink.write(row)?;
            sink.line_break()?;
        }
        sink.dedent()
    }

    fn visit_list(&mut self, node: &Node, kind: ListKind, sink: &mut dyn TextSink) -> Result<()> {
        if node.element_children().is_empty() {
            return Ok(());
        }
        let counter = match kind {
            ListKind::Ordered => node
                .attr("start")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .map_or(0, |start| start.saturating_sub(1)),
            _ => 0,
        };
        self.scoped(|v| {
            v.context.list = ListInfo {
                kind: Some(kind),
                depth: v.context.list.depth + 1,
                counter,
                saw_term: false,
            };
            v.visit_children(node, sink)
        })
    }

    fn visit_list_item(&mut self, node: &Node, sink: &mut dyn TextSink) -> Result<()> {
        let list = &mut self.context.list;
        let cycle = list.depth.saturating_sub(1) % 3;
        let label = match list.kind {
            Some(ListKind::Ordered) => {
                list.counter += 1;
                format!("{}.)", ordinal(list.counter, cycle))
            }
            _ => BULLETS[cycle].to_string(),
        };

        sink.indent(Some(&label))?;
        self.visit_children(node, sink)?;
        sink.dedent()
    }

    fn visit_description_list(&mut self, node: &Node, sink: &mut dyn TextSink) -> Result<()> {
        let rows: Vec<Node> = node
            .element_children()
            .into_iter()
            .filter(|row| !classify::is_hidden(row))
            .collect();
        if rows.is_empty() {
            return Ok(());
        }

        let has_terms = rows.iter().any(|row| row.is_tag("dt"));
        if !has_terms {
            let equations: Option<Vec<MathSource>> = rows.iter().map(single_math).collect();
            if let Some(equations) = equations {
                for math in &equations {
                    self.visit_math(math, true, sink)?;
                }
                return Ok(());
            }
        }

        self.scoped(|v| {
            v.context.list.kind = Some(ListKind::Description);
            v.context.list.saw_term = false;

            if !has_terms {
                sink.indent(None)?;
                v.visit_children(node, sink)?;
                return sink.dedent();
            }

            let mut open = false;
            for child in node.children() {
                if child.is_element() && classify::is_hidden(&child) {
                    continue;
                }
                if child.is_tag("dt") {
                    if open {
                        sink.dedent()?;
                    }
                    let term = v.flatten(&child)?;
                    sink.indent(Some(&term))?;
                    open = true;
                    v.context.list.saw_term = true;
                } else if child.is_tag("dd") {
                    if !open {
                        sink.indent(None)?;
                        open = true;
                    }
                    v.visit_children(&child, sink)?;
                    sink.line_break()?;
                } else {
                    v.visit(&child, sink)?;
                }
            }
            if open {
                sink.dedent()?;
            }
            Ok(())
        })
    }

    fn visit_footnotes(&mut self, node: &Node, sink: &mut dyn TextSink) -> Result<()> {
        if self.options.suppress_footnotes {
            return Ok(());
        }
        let mut number = 0;
        for item in node.element_children() {
            if classify::is_hidden(&item) {
                continue;
            }
            number += 1;
            let marker = Node::new_element("span", &[]);
            marker.append(&Node::new_text(&format!("[{}]", number)));
            let label = self.flatten(&marker)?;

            sink.indent(Some(&label))?;
            self.visit_children(&item, sink)?;
            sink.dedent()?;
        }
        Ok(())
    }

    fn visit_multi_image(&mut self, node: &Node) {
        for (image, caption) in classify::multi_image_pairs(node) {
            log::trace!(
                "Grouped image {:?} with caption {:?}",
                image.attr("src").unwrap_or_default(),
                caption.map(|c| collapse_whitespace(&c.text_content()))
            );
            self.grouped_images += 1;
        }
    }
}

/// The math node of a definition-only row holding nothing else.
fn single_math(row: &Node) -> Option<MathSource> {
    if !row.is_tag("dd") {
        return None;
    }
    let mut math = None;
    for child in row.children() {
        match child.kind() {
            NodeKind::Text => {
                if !child.text().unwrap_or_default().trim().is_empty() {
                    return None;
                }
            }
            NodeKind::Element if math.is_none() => {
                let is_math = child
                    .attr("typeof")
                    .is_some_and(|t| t.split_whitespace().any(|t| t == "mw:Extension/math"));
                if !is_math {
                    return None;
                }
                math = Some(classify::math_source(&child)?);
            }
            NodeKind::Element => return None,
            _ => {}
        }
    }
    math
}

/// Render a list counter in the style for its depth cycle.
fn ordinal(n: usize, cycle: usize) -> String {
    match cycle {
        1 => alphabetic(n),
        2 => roman(n),
        _ => n.to_string(),
    }
}

fn alphabetic(mut n: usize) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn roman(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    if n == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Resolve the display title of the document owning `body`.
///
/// Prefers the canonical page name from `link[rel="dc:isVersionOf"]`,
/// falling back to the `<title>` element.
fn resolve_title(body: &Node) -> Option<String> {
    let root = body.root();
    let canonical = root
        .select_one(r#"link[rel="dc:isVersionOf"]"#)
        .and_then(|link| link.attr("href"))
        .and_then(|href| {
            let segment = href.rsplit('/').next().unwrap_or(&href).to_string();
            let name = percent_decode(&segment).replace('_', " ");
            let name = collapse_whitespace(&name);
            (!name.is_empty()).then_some(name)
        });
    canonical.or_else(|| {
        root.select_one("title")
            .map(|t| collapse_whitespace(&t.text_content()))
            .filter(|t| !t.is_empty())
    })
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            if let Ok(byte) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
