//! The line-oriented output interface the visitor renders into.

use crate::error::Result;

/// A line-oriented text sink.
///
/// [`Formatter`](super::Formatter) lays text out into wrapped, indented
/// lines; [`Collector`](super::Collector) flattens everything into a single
/// line of inline text. The visitor only ever talks to this trait.
pub trait TextSink {
    /// Append a text fragment to the current line.
    fn write(&mut self, text: &str) -> Result<()>;

    /// End the current line, if one is in progress.
    fn line_break(&mut self) -> Result<()>;

    /// End the current paragraph with a single blank line.
    fn paragraph_break(&mut self) -> Result<()>;

    /// Open an indent scope, optionally with a hanging label.
    fn indent(&mut self, label: Option<&str>) -> Result<()>;

    /// Close the innermost indent scope.
    fn dedent(&mut self) -> Result<()>;

    /// Finish any pending line and hand everything written to the output.
    fn flush(&mut self) -> Result<()>;

    /// Number of currently open indent scopes.
    fn depth(&self) -> usize;
}
