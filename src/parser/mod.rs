//! Article HTML parsing.

mod html;

pub use html::{parse_html, parse_reader};
