//! Incremental line layout: word wrap, paragraphs and indent scopes.

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::error::Result;

use super::normalize::is_breaking_space;
use super::options::MIN_USABLE_COLUMNS;
use super::{RenderOptions, TextSink};

/// Layout state of one indent scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct IndentState {
    /// Column the scope is indented to
    indent: usize,
    /// Extra columns continuation lines hang past a label
    hang: usize,
    /// The label line has not been emitted yet
    labeled: bool,
}

/// Word-wrapping text sink writing finished lines to `W`.
///
/// Text accumulates in a line buffer until a line or paragraph break, at
/// which point it is wrapped at the current indent and written out.
pub struct Formatter<W: Write> {
    writer: W,
    column_width: usize,
    tab_width: usize,
    no_wrap: bool,
    buffer: Vec<String>,
    at_line_start: bool,
    at_paragraph_start: bool,
    label_open: bool,
    state: IndentState,
    stack: Vec<IndentState>,
}

impl<W: Write> Formatter<W> {
    /// Create a formatter with layout settings taken from `options`.
    pub fn new(writer: W, options: &RenderOptions) -> Self {
        Self {
            writer,
            column_width: options.column_width,
            tab_width: options.tab_width,
            no_wrap: options.no_wrap,
            buffer: Vec::new(),
            at_line_start: true,
            at_paragraph_start: true,
            label_open: false,
            state: IndentState::default(),
            stack: Vec::new(),
        }
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the formatter and return the underlying writer.
    ///
    /// Buffered text that was never broken or flushed is discarded.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Check whether nothing has been written since the last line break.
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Check whether nothing has been written since the last paragraph break.
    pub fn at_paragraph_start(&self) -> bool {
        self.at_paragraph_start
    }

    /// Limit an indent so a wrapped line keeps its usable columns.
    ///
    /// Unwrapped output has no column budget and keeps the literal indent.
    fn clamp(&self, indent: usize) -> usize {
        if self.no_wrap {
            return indent;
        }
        indent.min(self.column_width.saturating_sub(MIN_USABLE_COLUMNS))
    }

    /// Wrap a buffered line at the current indent.
    fn wrap(&self, text: &str) -> Vec<String> {
        let rest = self.clamp(self.state.indent + self.state.hang);
        let first = if self.state.labeled {
            self.clamp(self.state.indent)
        } else {
            rest
        };
        let words: Vec<&str> = text
            .split(is_breaking_space)
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Vec::new();
        }

        if self.no_wrap {
            return vec![format!("{}{}", " ".repeat(first), words.join(" "))];
        }

        let mut lines = Vec::new();
        let mut line = " ".repeat(first);
        let mut width = first;
        let mut empty = true;
        for word in words {
            let word_width = word.width();
            if !empty && width + 1 + word_width > self.column_width {
                lines.push(std::mem::replace(&mut line, " ".repeat(rest)));
                width = rest;
                empty = true;
            }
            if !empty {
                line.push(' ');
                width += 1;
            }
            line.push_str(word);
            width += word_width;
            empty = false;
        }
        if !empty {
            lines.push(line);
        }
        lines
    }
}

impl<W: Write> TextSink for Formatter<W> {
    fn write(&mut self, text: &str) -> Result<()> {
        let text = if self.at_line_start || self.at_paragraph_start {
            text.trim_start_matches(is_breaking_space)
        } else {
            text
        };
        if text.is_empty() {
            return Ok(());
        }
        self.buffer.push(text.to_string());
        self.at_line_start = false;
        self.at_paragraph_start = false;
        self.label_open = false;
        Ok(())
    }

    fn line_break(&mut self) -> Result<()> {
        if self.at_line_start {
            return Ok(());
        }
        let text = self.buffer.concat();
        self.buffer.clear();
        for line in self.wrap(&text) {
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        self.at_line_start = true;
        self.label_open = false;

        // a hanging label only sits on the first line of its scope
        self.state.labeled = false;
        Ok(())
    }

    fn paragraph_break(&mut self) -> Result<()> {
        // a block opening a labeled scope continues on the label line
        if self.at_paragraph_start || self.label_open {
            return Ok(());
        }
        self.line_break()?;
        self.writer.write_all(b"\n")?;
        self.at_paragraph_start = true;
        self.at_line_start = true;
        Ok(())
    }

    fn indent(&mut self, label: Option<&str>) -> Result<()> {
        self.line_break()?;
        self.stack.push(self.state);
        let label = label.filter(|l| !l.is_empty());
        self.state = IndentState {
            indent: self.state.indent + self.tab_width,
            hang: label.map_or(0, |l| l.width() + 1),
            labeled: label.is_some(),
        };
        if let Some(label) = label {
            self.write(&format!("{} ", label))?;
            self.label_open = true;
        }
        Ok(())
    }

    fn dedent(&mut self) -> Result<()> {
        self.line_break()?;
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.line_break()?;
        self.writer.flush()?;
        Ok(())
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}
