//! Element classification.
//!
//! Each element resolves to exactly one [`Handler`], checked in priority
//! order: hidden content, language switch, direction switch, semantic type
//! (`typeof`), relation (`rel`), tag name, and finally plain recursion.

use serde::Deserialize;

use crate::model::Node;

use super::Direction;

/// Kind of list a list item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
    Description,
}

/// Math extracted from an element's embedded metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSource {
    /// TeX source
    pub source: String,
    /// Whether the author asked for display (block) mode
    pub display: bool,
}

/// How an element is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Contributes nothing: hidden content, metadata, media, tables and
    /// footnote markers.
    Skip,
    /// Switch to a language for the subtree.
    Language(String),
    /// Switch directionality for the subtree.
    Direction(Direction),
    Math(MathSource),
    /// A footnote list.
    Footnotes,
    /// Grouped images with captions.
    MultiImage,
    Body,
    Paragraph,
    /// A heading with its tag level (1 to 6).
    Heading(u8),
    Subscript,
    Superscript,
    LineBreak,
    List(ListKind),
    ListItem,
    DescriptionList,
    Quotation,
    /// Generic block container.
    Block,
    /// Anything else: flatten into the children.
    Children,
}

/// Classes marking non-printing content.
const HIDDEN_CLASSES: &[&str] = &[
    "noprint",
    "metadata",
    "ambox",
    "navbox",
    "vertical-navbox",
    "mw-editsection",
    "catlinks",
    "portal",
    "sisterproject",
    "magnify",
    "mw-empty-elt",
];

/// Tags whose content is never rendered.
const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "link", "meta", "title", "noscript", "audio", "video", "table",
    "figure", "img",
];

#[derive(Debug, Deserialize)]
struct ExtensionData {
    #[serde(default)]
    attrs: ExtensionAttrs,
    body: Option<ExtensionBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtensionAttrs {
    display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtensionBody {
    extsrc: Option<String>,
}

/// Classify an element given the language and direction currently in effect.
pub fn classify(node: &Node, language: &str, direction: Direction) -> Handler {
    if is_hidden(node) && !is_multi_image(node) {
        return Handler::Skip;
    }

    if let Some(lang) = node.attr("lang").filter(|l| !l.is_empty()) {
        if !lang.eq_ignore_ascii_case(language) {
            return Handler::Language(lang);
        }
    }

    // `auto` parses to None and is ignored
    if let Some(dir) = node.attr("dir").and_then(|d| Direction::parse(&d)) {
        if dir != direction {
            return Handler::Direction(dir);
        }
    }

    if let Some(handler) = node.attr("typeof").and_then(|t| by_type(node, &t)) {
        return handler;
    }

    if let Some(rel) = node.attr("rel") {
        if rel
            .split_whitespace()
            .any(|r| r == "dc:references" || r == "mw:referencedBy")
        {
            return Handler::Skip;
        }
    }

    by_tag(node)
}

fn by_type(node: &Node, types: &str) -> Option<Handler> {
    for t in types.split_whitespace() {
        match t {
            "mw:Extension/math" => match math_source(node) {
                Some(math) => return Some(Handler::Math(math)),
                None => continue,
            },
            "mw:Extension/ref" => return Some(Handler::Skip),
            "mw:Extension/references" => return Some(Handler::Footnotes),
            t if t.starts_with("mw:File") || t.starts_with("mw:Image") => {
                return Some(Handler::Skip)
            }
            _ => {}
        }
    }
    None
}

fn by_tag(node: &Node) -> Handler {
    let Some(tag) = node.tag() else {
        return Handler::Children;
    };
    let tag = tag.to_ascii_lowercase();

    if is_multi_image(node) {
        return Handler::MultiImage;
    }
    if SKIPPED_TAGS.contains(&tag.as_str()) {
        return Handler::Skip;
    }

    match tag.as_str() {
        "body" => Handler::Body,
        "p" => Handler::Paragraph,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            Handler::Heading(tag.as_bytes()[1] - b'0')
        }
        "sub" => Handler::Subscript,
        "sup" => Handler::Superscript,
        "br" => Handler::LineBreak,
        "ul" => Handler::List(ListKind::Unordered),
        "ol" => Handler::List(ListKind::Ordered),
        "li" => Handler::ListItem,
        "dl" => Handler::DescriptionList,
        "blockquote" => Handler::Quotation,
        "div" => Handler::Block,
        _ => Handler::Children,
    }
}

/// Extract math from a `data-mw` payload.
///
/// A missing or malformed payload is logged and yields `None`, so the
/// element is classified as if it had no semantic type.
pub fn math_source(node: &Node) -> Option<MathSource> {
    let Some(payload) = node.attr("data-mw") else {
        log::warn!("Math element without data-mw payload");
        return None;
    };
    let data: ExtensionData = match serde_json::from_str(&payload) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Malformed data-mw payload on math element: {}", e);
            return None;
        }
    };
    let Some(source) = data.body.and_then(|b| b.extsrc) else {
        log::warn!("Math payload without source");
        return None;
    };
    Some(MathSource {
        source,
        display: data.attrs.display.as_deref() == Some("block"),
    })
}

/// Check whether an element is marked as non-printing.
pub fn is_hidden(node: &Node) -> bool {
    if !node.is_element() {
        return false;
    }
    node.has_attr("hidden")
        || node.attr("style").is_some_and(|s| is_display_none(&s))
        || HIDDEN_CLASSES.iter().any(|c| node.has_class(c))
}

fn is_display_none(style: &str) -> bool {
    style.split(';').any(|decl| {
        let mut parts = decl.splitn(2, ':');
        let property = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim();
        let value = value.trim_end_matches("!important").trim();
        property.eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
    })
}

/// Check whether an element is a grouped-images-with-captions container.
pub fn is_multi_image(node: &Node) -> bool {
    (node.is_tag("div") && node.has_class("thumb") && node.has_class("tmulti"))
        || (node.is_tag("table") && node.has_class("multiimage"))
}

/// Pair each image of a grouped-image container with its caption.
///
/// Pairs are returned in document order. An image without a caption is
/// paired with `None`.
pub fn multi_image_pairs(node: &Node) -> Vec<(Node, Option<Node>)> {
    if node.is_tag("table") {
        return table_image_pairs(node);
    }

    let mut singles = Vec::new();
    collect(node, &|n| n.has_class("tsingle"), &mut singles);
    singles
        .iter()
        .filter_map(|single| {
            let image = single.find_descendant(&|n| n.is_tag("img"))?;
            let caption = single.find_descendant(&|n| n.has_class("thumbcaption"));
            Some((image, caption))
        })
        .collect()
}

/// Image rows are followed by caption rows; cells pair up by column.
fn table_image_pairs(table: &Node) -> Vec<(Node, Option<Node>)> {
    let mut rows = Vec::new();
    collect(table, &|n| n.is_tag("tr"), &mut rows);

    let has_image = |n: &Node| n.find_descendant(&|d| d.is_tag("img")).is_some();
    let cells = |row: &Node| -> Vec<Node> {
        row.element_children()
            .into_iter()
            .filter(|c| c.is_tag("td") || c.is_tag("th"))
            .collect()
    };

    let mut pairs = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        if !has_image(row) {
            continue;
        }
        let captions = rows
            .get(i + 1)
            .filter(|next| !has_image(next))
            .map(|next| cells(next))
            .unwrap_or_default();
        for (column, cell) in cells(row).iter().enumerate() {
            if let Some(image) = cell.find_descendant(&|d| d.is_tag("img")) {
                pairs.push((image, captions.get(column).cloned()));
            }
        }
    }
    pairs
}

fn collect(node: &Node, pred: &dyn Fn(&Node) -> bool, out: &mut Vec<Node>) {
    for child in node.element_children() {
        if pred(&child) {
            out.push(child.clone());
        }
        collect(&child, pred, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use crate::parser::parse_html;

    /// Parse `html` and find the first match; the document keeps the node populated.
    fn first(html: &str, selector: &str) -> (Document, Node) {
        let doc = parse_html(html);
        let node = doc.root().select_one(selector).unwrap();
        (doc, node)
    }

    fn class_of(html: &str, selector: &str) -> Handler {
        let (_doc, node) = first(html, selector);
        classify(&node, "en", Direction::Ltr)
    }

    #[test]
    fn test_hidden_content() {
        assert_eq!(class_of(r#"<p hidden>x</p>"#, "p"), Handler::Skip);
        assert_eq!(
            class_of(r#"<p style="color: red; display : none">x</p>"#, "p"),
            Handler::Skip
        );
        assert_eq!(class_of(r#"<div class="navbox">x</div>"#, "div"), Handler::Skip);
        assert_eq!(class_of(r#"<p style="display:block">x</p>"#, "p"), Handler::Paragraph);
    }

    #[test]
    fn test_hidden_multi_image_is_excepted() {
        let html = r#"<div class="thumb tmulti" style="display:none"><div class="tsingle"></div></div>"#;
        assert_eq!(class_of(html, "div"), Handler::MultiImage);
    }

    #[test]
    fn test_hidden_outranks_language() {
        let html = r#"<span lang="fr" class="noprint">x</span>"#;
        assert_eq!(class_of(html, "span"), Handler::Skip);
    }

    #[test]
    fn test_language_and_direction() {
        assert_eq!(
            class_of(r#"<span lang="he">x</span>"#, "span"),
            Handler::Language("he".to_string())
        );
        assert_eq!(class_of(r#"<span lang="EN">x</span>"#, "span"), Handler::Children);
        assert_eq!(
            class_of(r#"<p dir="rtl">x</p>"#, "p"),
            Handler::Direction(Direction::Rtl)
        );
        assert_eq!(class_of(r#"<p dir="auto">x</p>"#, "p"), Handler::Paragraph);
        assert_eq!(class_of(r#"<p dir="ltr">x</p>"#, "p"), Handler::Paragraph);
    }

    #[test]
    fn test_semantic_types() {
        let math = r#"<span typeof="mw:Extension/math" data-mw='{"name":"math","attrs":{"display":"block"},"body":{"extsrc":"x^2"}}'>img</span>"#;
        assert_eq!(
            class_of(math, "span"),
            Handler::Math(MathSource {
                source: "x^2".to_string(),
                display: true,
            })
        );
        assert_eq!(
            class_of(r#"<sup typeof="mw:Extension/ref">[1]</sup>"#, "sup"),
            Handler::Skip
        );
        assert_eq!(
            class_of(r#"<ol typeof="mw:Extension/references"><li>a</li></ol>"#, "ol"),
            Handler::Footnotes
        );
        assert_eq!(
            class_of(r#"<figure typeof="mw:File/Thumb"></figure>"#, "figure"),
            Handler::Skip
        );
    }

    #[test]
    fn test_malformed_math_falls_through() {
        let html = r#"<span typeof="mw:Extension/math" data-mw="{not json">x</span>"#;
        assert_eq!(class_of(html, "span"), Handler::Children);

        let html = r#"<div typeof="mw:Extension/math" data-mw='{"body":{}}'>x</div>"#;
        assert_eq!(class_of(html, "div"), Handler::Block);
    }

    #[test]
    fn test_relations() {
        let html = r##"<span rel="mw:referencedBy"><a href="#r">↑</a></span>"##;
        assert_eq!(class_of(html, "span"), Handler::Skip);
    }

    #[test]
    fn test_tags() {
        assert_eq!(class_of("<h3>x</h3>", "h3"), Handler::Heading(3));
        assert_eq!(class_of("<ol><li>x</li></ol>", "ol"), Handler::List(ListKind::Ordered));
        assert_eq!(class_of("<ul><li>x</li></ul>", "li"), Handler::ListItem);
        assert_eq!(class_of("<table><tr><td>x</td></tr></table>", "table"), Handler::Skip);
        assert_eq!(class_of("<p><a href='x'>y</a></p>", "a"), Handler::Children);
        assert_eq!(class_of("<p>x<br>y</p>", "br"), Handler::LineBreak);
    }

    #[test]
    fn test_thumb_multi_image_pairs() {
        let html = r#"<div class="thumb tmulti"><div class="thumbinner">
            <div class="tsingle"><img src="a.png"><div class="thumbcaption">A</div></div>
            <div class="tsingle"><img src="b.png"><div class="thumbcaption">B</div></div>
            <div class="tsingle"><img src="c.png"></div>
        </div></div>"#;
        let (_doc, container) = first(html, "div");
        let pairs = multi_image_pairs(&container);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].0.attr("src").as_deref(), Some("a.png"));
        assert_eq!(pairs[0].1.as_ref().unwrap().text_content(), "A");
        assert_eq!(pairs[1].1.as_ref().unwrap().text_content(), "B");
        assert!(pairs[2].1.is_none());
    }

    #[test]
    fn test_table_multi_image_pairs() {
        let html = r#"<table class="multiimage">
            <tr><td><img src="a.png"></td><td><img src="b.png"></td></tr>
            <tr><td>Caption A</td><td>Caption B</td></tr>
        </table>"#;
        let (_doc, container) = first(html, "table");
        let pairs = multi_image_pairs(&container);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].0.attr("src").as_deref(), Some("b.png"));
        assert_eq!(pairs[1].1.as_ref().unwrap().text_content(), "Caption B");
    }
}
