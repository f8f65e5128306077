//! Document-level types.

use markup5ever_rcdom::RcDom;

use super::Node;

/// A parsed article document.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Wrap a parsed DOM.
    pub fn from_dom(dom: RcDom) -> Self {
        Self { dom }
    }

    /// Get the document root node.
    pub fn root(&self) -> Node {
        Node::from_handle(self.dom.document.clone())
    }

    /// Get the `<body>` element, or the root when there is none.
    pub fn body(&self) -> Node {
        let root = self.root();
        root.select_one("body").unwrap_or(root)
    }

    /// Get the `<head>` element if present.
    pub fn head(&self) -> Option<Node> {
        self.root().select_one("head")
    }

    /// Create a detached element owned by this document.
    pub fn create_element(&self, tag: &str, attrs: &[(&str, &str)]) -> Node {
        Node::new_element(tag, attrs)
    }

    /// Create a detached text node owned by this document.
    pub fn create_text(&self, text: &str) -> Node {
        Node::new_text(text)
    }

    /// Create an element holding a single text child.
    pub fn create_text_element(&self, tag: &str, text: &str) -> Node {
        let element = self.create_element(tag, &[]);
        element.append(&self.create_text(text));
        element
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from_dom(RcDom::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    #[test]
    fn test_body_and_head() {
        let doc = parse_html("<html><head><title>T</title></head><body><p>x</p></body></html>");
        assert!(doc.body().is_tag("body"));
        assert_eq!(doc.head().unwrap().text_content(), "T");
    }

    #[test]
    fn test_empty_document_body_falls_back_to_root() {
        let doc = Document::default();
        assert_eq!(doc.body(), doc.root());
        assert!(doc.head().is_none());
    }

    #[test]
    fn test_create_text_element() {
        let doc = Document::default();
        let h1 = doc.create_text_element("h1", "Title");
        assert!(h1.is_tag("h1"));
        assert_eq!(h1.text_content(), "Title");
    }
}
