//! Plain text rendering for standalone documents.

use crate::error::Result;
use crate::parser::parse_html;

use super::{Formatter, RenderOptions, TextSink, Visitor};

/// Render one HTML document to plain text.
///
/// The document body is rendered on its own, without a collection title.
pub fn to_text(html: &str, options: &RenderOptions) -> Result<String> {
    options.validate()?;

    let doc = parse_html(html);
    let mut visitor = Visitor::new(options);
    let mut formatter = Formatter::new(Vec::new(), options);
    visitor.visit(&doc.body(), &mut formatter)?;
    formatter.flush()?;

    Ok(String::from_utf8_lossy(&formatter.into_inner()).into_owned())
}
