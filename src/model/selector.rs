//! Single compound selectors (`tag.class[attr=value]`).

use super::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Tag(String),
    Class(String),
    HasAttr(String),
    AttrEquals(String, String),
}

/// A parsed compound selector.
///
/// Supports an optional tag name followed by any number of `.class`,
/// `[attr]` and `[attr=value]` parts. Combinators are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Part>,
}

impl Selector {
    /// Parse a selector string; `None` when it is empty or malformed.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let mut parts = Vec::new();
        let mut rest = s;

        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '*'))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                parts.push(Part::Tag(tag.to_ascii_lowercase()));
            }
            rest = &rest[tag_len..];
        }

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let len = after
                    .find(|c: char| c == '.' || c == '[')
                    .unwrap_or(after.len());
                if len == 0 {
                    return None;
                }
                parts.push(Part::Class(after[..len].to_string()));
                rest = &after[len..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']')?;
                let body = &after[..close];
                match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                        parts.push(Part::AttrEquals(
                            name.trim().to_string(),
                            value.to_string(),
                        ));
                    }
                    None if !body.trim().is_empty() => {
                        parts.push(Part::HasAttr(body.trim().to_string()));
                    }
                    None => return None,
                }
                rest = &after[close + 1..];
            } else {
                return None;
            }
        }

        if parts.is_empty() && s != "*" {
            return None;
        }
        Some(Self { parts })
    }

    /// Check whether an element matches every part of the selector.
    pub fn matches(&self, node: &Node) -> bool {
        if !node.is_element() {
            return false;
        }
        self.parts.iter().all(|part| match part {
            Part::Tag(tag) => node.is_tag(tag),
            Part::Class(class) => node.has_class(class),
            Part::HasAttr(name) => node.has_attr(name),
            Part::AttrEquals(name, value) => node.attr(name).as_deref() == Some(value.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    #[test]
    fn test_parse_compound() {
        let sel = Selector::parse(r#"link[rel="dc:isVersionOf"]"#).unwrap();
        assert_eq!(
            sel.parts,
            vec![
                Part::Tag("link".into()),
                Part::AttrEquals("rel".into(), "dc:isVersionOf".into()),
            ]
        );

        let sel = Selector::parse("div.thumb.tmulti").unwrap();
        assert_eq!(sel.parts.len(), 3);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Selector::parse("").is_none());
        assert!(Selector::parse("div > p").is_none());
        assert!(Selector::parse("[unterminated").is_none());
        assert!(Selector::parse("p.").is_none());
    }

    #[test]
    fn test_matches_in_document_order() {
        let doc = parse_html(
            r#"<div class="a"><span data-x="1">one</span></div><span data-x="2">two</span>"#,
        );
        let body = doc.body();
        let found = body.select_one("span[data-x]").unwrap();
        assert_eq!(found.text_content(), "one");
        let found = body.select_one("span[data-x=2]").unwrap();
        assert_eq!(found.text_content(), "two");
        assert!(body.select_one("p").is_none());
    }
}
