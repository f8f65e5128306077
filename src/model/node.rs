//! Read-only view over parsed document nodes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use html5ever::{ns, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node as DomNode, NodeData};

use super::selector::Selector;

/// Kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root
    Document,
    /// An element with a tag, attributes and children
    Element,
    /// A run of character data
    Text,
    /// Comments, doctypes and processing instructions
    Other,
}

/// A node in a parsed document.
///
/// Cloning is cheap; clones refer to the same underlying node.
///
/// A `Node` taken from a [`Document`](super::Document) must not outlive it:
/// dropping the document detaches every child list, leaving retained nodes
/// without descendants.
#[derive(Clone)]
pub struct Node(Handle);

impl Node {
    /// Wrap an rcdom handle.
    pub fn from_handle(handle: Handle) -> Self {
        Self(handle)
    }

    /// Get the underlying rcdom handle.
    pub fn handle(&self) -> &Handle {
        &self.0
    }

    /// Get the node kind.
    pub fn kind(&self) -> NodeKind {
        match self.0.data {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text { .. } => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    /// Check if this node is an element.
    pub fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    /// Get the lowercase tag name of an element.
    pub fn tag(&self) -> Option<&str> {
        match self.0.data {
            NodeData::Element { ref name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    /// Check if this is an element with the given tag name.
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag().is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<String> {
        match self.0.data {
            NodeData::Element { ref attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == name)
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    /// Check if an attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        match self.0.data {
            NodeData::Element { ref attrs, .. } => {
                attrs.borrow().iter().any(|a| &*a.name.local == name)
            }
            _ => false,
        }
    }

    /// Check class membership.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|value| value.split_ascii_whitespace().any(|c| c == class))
    }

    /// Get the raw data of a text node.
    pub fn text(&self) -> Option<String> {
        match self.0.data {
            NodeData::Text { ref contents } => Some(contents.borrow().to_string()),
            _ => None,
        }
    }

    /// Concatenated raw text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.0, &mut out);
        out
    }

    /// Get all children in document order.
    pub fn children(&self) -> Vec<Node> {
        self.0.children.borrow().iter().cloned().map(Node).collect()
    }

    /// Get element children in document order.
    pub fn element_children(&self) -> Vec<Node> {
        self.children()
            .into_iter()
            .filter(Node::is_element)
            .collect()
    }

    /// Get the parent node, if attached.
    pub fn parent(&self) -> Option<Node> {
        let weak = self.0.parent.take();
        let parent = weak.as_ref().and_then(Weak::upgrade);
        self.0.parent.set(weak);
        parent.map(Node)
    }

    /// Walk up to the topmost ancestor (the owning document when attached).
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Next sibling that is an element.
    pub fn next_element_sibling(&self) -> Option<Node> {
        let siblings = self.parent()?.children();
        let index = siblings.iter().position(|s| s == self)?;
        siblings.into_iter().skip(index + 1).find(Node::is_element)
    }

    /// Previous sibling that is an element.
    pub fn previous_element_sibling(&self) -> Option<Node> {
        let siblings = self.parent()?.children();
        let index = siblings.iter().position(|s| s == self)?;
        siblings.into_iter().take(index).rev().find(Node::is_element)
    }

    /// Find the first descendant element matching a simple selector.
    ///
    /// Invalid selectors match nothing.
    pub fn select_one(&self, selector: &str) -> Option<Node> {
        let selector = Selector::parse(selector)?;
        self.find_descendant(&|node| selector.matches(node))
    }

    /// Depth-first search of descendants (not including `self`).
    pub fn find_descendant(&self, pred: &dyn Fn(&Node) -> bool) -> Option<Node> {
        for child in self.children() {
            if pred(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Append a child, detaching nothing; used for synthetic subtrees.
    pub fn append(&self, child: &Node) {
        child.0.parent.set(Some(Rc::downgrade(&self.0)));
        self.0.children.borrow_mut().push(child.0.clone());
    }

    pub(crate) fn new_element(tag: &str, attrs: &[(&str, &str)]) -> Self {
        let attributes = attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(*name)),
                value: value.to_string().into(),
            })
            .collect();

        Node(Rc::new(DomNode {
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
            data: NodeData::Element {
                name: QualName::new(None, ns!(html), LocalName::from(tag)),
                attrs: RefCell::new(attributes),
                template_contents: Default::default(),
                mathml_annotation_xml_integration_point: false,
            },
        }))
    }

    pub(crate) fn new_text(text: &str) -> Self {
        Node(Rc::new(DomNode {
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
            data: NodeData::Text {
                contents: RefCell::new(text.to_string().into()),
            },
        }))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Element => write!(f, "<{}>", self.tag().unwrap_or_default()),
            NodeKind::Text => write!(f, "{:?}", self.text().unwrap_or_default()),
            NodeKind::Document => f.write_str("#document"),
            NodeKind::Other => f.write_str("#other"),
        }
    }
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { ref contents } = handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_html;

    #[test]
    fn test_attributes_and_classes() {
        let doc = parse_html(r#"<p id="a" class="one two">x</p>"#);
        let p = doc.body().select_one("p").unwrap();
        assert_eq!(p.tag(), Some("p"));
        assert_eq!(p.attr("id").as_deref(), Some("a"));
        assert!(p.has_attr("class"));
        assert!(p.has_class("two"));
        assert!(!p.has_class("on"));
        assert!(p.attr("missing").is_none());
    }

    #[test]
    fn test_element_siblings() {
        let doc = parse_html("<div><b>1</b> text <i>2</i></div>");
        let b = doc.body().select_one("b").unwrap();
        let i = b.next_element_sibling().unwrap();
        assert!(i.is_tag("i"));
        assert_eq!(i.previous_element_sibling(), Some(b.clone()));
        assert!(i.next_element_sibling().is_none());
    }

    #[test]
    fn test_text_content_and_root() {
        let doc = parse_html("<p>Hello <b>bold</b> world</p>");
        let b = doc.body().select_one("b").unwrap();
        assert_eq!(b.parent().unwrap().text_content(), "Hello bold world");
        assert_eq!(b.root(), doc.root());
    }

    #[test]
    fn test_synthetic_subtree() {
        let doc = parse_html("");
        let span = doc.create_element("span", &[("class", "marker")]);
        span.append(&doc.create_text("[1]"));
        assert!(span.has_class("marker"));
        assert_eq!(span.text_content(), "[1]");
        assert_eq!(span.children()[0].parent(), Some(span.clone()));
    }
}
