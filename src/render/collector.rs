//! Inline flattening sink.

use crate::error::Result;

use super::normalize::collapse_whitespace;
use super::TextSink;

/// A sink that flattens everything written into one line of text.
///
/// Breaks become single spaces and indentation is ignored, apart from
/// inserting any label verbatim. Used to collect heading text, term labels,
/// sub/superscript content and footnote markers.
#[derive(Debug, Default)]
pub struct Collector {
    buffer: String,
    depth: usize,
}

impl Collector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish collecting, collapsing whitespace runs to single spaces.
    pub fn finish(self) -> String {
        collapse_whitespace(&self.buffer)
    }
}

impl TextSink for Collector {
    fn write(&mut self, text: &str) -> Result<()> {
        self.buffer.push_str(text);
        Ok(())
    }

    fn line_break(&mut self) -> Result<()> {
        self.buffer.push(' ');
        Ok(())
    }

    fn paragraph_break(&mut self) -> Result<()> {
        self.buffer.push(' ');
        Ok(())
    }

    fn indent(&mut self, label: Option<&str>) -> Result<()> {
        self.buffer.push(' ');
        if let Some(label) = label {
            self.buffer.push_str(label);
            self.buffer.push(' ');
        }
        self.depth += 1;
        Ok(())
    }

    fn dedent(&mut self) -> Result<()> {
        self.buffer.push(' ');
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn depth(&self) -> usize {
        self.depth
    }
}
