//! # unwiki
//!
//! Render wiki article collections (Parsoid-style HTML) as fixed-width
//! plain text.
//!
//! Headings, paragraphs, lists, quotations, footnotes and inline TeX math
//! are kept as text approximations. Images and tables are dropped.
//!
//! ## Quick Start
//!
//! ```
//! use unwiki::{to_text, RenderOptions};
//!
//! fn main() -> unwiki::Result<()> {
//!     let html = r#"<h2>Overview</h2><p>Water is H<sub>2</sub>O.</p>"#;
//!     let text = to_text(html, &RenderOptions::default().with_column_width(40))?;
//!     assert_eq!(text, "Overview\n\nWater is H₂O.\n\n");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Word wrapping**: greedy wrap at a configurable column, with hanging
//!   list labels and nested indentation
//! - **Math**: TeX sources from math extension nodes rendered as Unicode
//! - **Languages**: per-element language and direction scoping, with
//!   optional Unicode bidi isolation
//! - **Collections**: chapters and articles from an extracted bundle
//!   directory or any [`ArticleStore`]

pub mod convert;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod tex;

// Re-export commonly used types
pub use convert::{
    convert, convert_directory, ArticleStore, ConvertStats, DirectoryStore, MemoryStore,
};
pub use error::{Error, Result};
pub use model::{Collection, Document, Item, Node, SiteInfo};
pub use parser::{parse_html, parse_reader};
pub use render::{Direction, RenderOptions, TextSink, Visitor};

/// Render one HTML document to plain text with the given options.
///
/// # Example
///
/// ```
/// use unwiki::{to_text, RenderOptions};
///
/// let text = to_text("<ol><li>one</li><li>two</li></ol>", &RenderOptions::default()).unwrap();
/// assert_eq!(text, "  1.) one\n  2.) two\n");
/// ```
pub fn to_text(html: &str, options: &RenderOptions) -> Result<String> {
    render::to_text(html, options)
}

/// Render an HTML file to plain text with default options.
pub fn file_to_text<P: AsRef<std::path::Path>>(path: P) -> Result<String> {
    let html = std::fs::read_to_string(path)?;
    to_text(&html, &RenderOptions::default())
}
