//! HTML parsing into the document model.

use std::io::Read;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use markup5ever_rcdom::RcDom;

use crate::error::Result;
use crate::model::Document;

fn parse_opts() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Parse an HTML string.
///
/// HTML parsing is error-tolerant, so this never fails.
pub fn parse_html(html: &str) -> Document {
    let dom = parse_document(RcDom::default(), parse_opts()).one(html);
    Document::from_dom(dom)
}

/// Parse UTF-8 HTML from a reader.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Document> {
    let dom = parse_document(RcDom::default(), parse_opts())
        .from_utf8()
        .read_from(&mut reader)?;
    Ok(Document::from_dom(dom))
}
