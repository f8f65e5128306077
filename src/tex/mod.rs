//! TeX math to Unicode text.
//!
//! The interpreter scans left to right for backslash macros, interprets each
//! macro's arguments recursively and replaces the call with its expansion.
//! Unknown macros are passed through verbatim and reported once per name.
//!
//! # Example
//!
//! ```
//! use unwiki::tex::TexInterpreter;
//!
//! let mut tex = TexInterpreter::new();
//! assert_eq!(tex.interpret(r"\alpha+\beta"), "α+β");
//! assert_eq!(tex.interpret(r"x^2 + \sqrt{4}"), "x² + √(4)");
//! ```

mod scan;
mod symbols;

use std::collections::BTreeSet;

use regex::{Captures, Regex};

use crate::render::scripts::{to_subscript, to_superscript};
use scan::Delim;
use symbols::{Arg, Arity};

/// Block environments whose bodies are unwrapped into display rows.
const BLOCK_ENVIRONMENTS: &[&str] = &[
    "equation", "align", "gather", "eqnarray", "multline", "multiline", "alignat", "falign",
];

/// Stand-ins for `_` and `^` produced by macro expansion, hidden from the
/// script pass of enclosing calls.
const EXPANDED_SUB: char = '\u{E000}';
const EXPANDED_SUP: char = '\u{E001}';

/// Interpreted math, split into rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathText {
    /// One entry per output line; inline math has exactly one
    pub rows: Vec<String>,
    /// Whether the math is set apart on its own lines
    pub display: bool,
}

/// Macro interpreter.
///
/// Owns the set of unknown macro names already reported, so separate
/// instances warn independently.
pub struct TexInterpreter {
    warned: BTreeSet<String>,
    script_regex: Regex,
    begin_regex: Regex,
}

impl Default for TexInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl TexInterpreter {
    /// Create an interpreter with an empty warning table.
    pub fn new() -> Self {
        Self {
            warned: BTreeSet::new(),
            script_regex: Regex::new(r"([_^])(?:\{([^{}]*)\}|([0-9]+|[^\s{}\\]))").unwrap(),
            begin_regex: Regex::new(r"\\begin\s*\{([A-Za-z]+\*?)\}").unwrap(),
        }
    }

    /// Unknown macro names seen so far, sorted.
    pub fn unknown_macros(&self) -> impl Iterator<Item = &str> {
        self.warned.iter().map(String::as_str)
    }

    /// Interpret a math source, unwrapping block environments.
    ///
    /// `display` requests display mode; an unwrapped block environment forces
    /// it. Display math yields one row per source line outside any group,
    /// inline math one row. Whitespace runs within a row collapse to a space.
    pub fn render(&mut self, source: &str, display: bool) -> MathText {
        let (source, unwrapped) = self.unwrap_environments(source);
        let display = display || unwrapped;

        let rows = if display {
            scan::split_lines(&source)
                .iter()
                .map(|row| squeeze(&self.interpret(row)))
                .filter(|row| !row.is_empty())
                .collect()
        } else {
            vec![squeeze(&self.interpret(&source))]
        };
        MathText { rows, display }
    }

    /// Interpret a macro-language string into Unicode text.
    pub fn interpret(&mut self, src: &str) -> String {
        let mut out = String::with_capacity(src.len());
        let mut pos = 0;

        while let Some(call) = scan::next_macro(src, pos) {
            out.push_str(&src[pos..call.start]);
            pos = call.end;

            match symbols::lookup(call.name) {
                Some(known) => {
                    let (args, end) = self.take_args(src, pos, known.arity);
                    pos = end;
                    push_expanded(&mut out, &known.expand(&args));
                }
                None => {
                    let (args, end) = self.take_groups(src, pos);
                    pos = end;
                    self.warn_unknown(call.name);
                    out.push('\\');
                    push_expanded(&mut out, call.name);
                    for arg in &args {
                        let (open, close) = arg.delim.pair();
                        out.push_str(open);
                        push_expanded(&mut out, &arg.text);
                        out.push_str(close);
                    }
                    out.push(' ');
                }
            }
        }
        out.push_str(&src[pos..]);

        self.apply_scripts(&out)
            .chars()
            .map(|c| match c {
                EXPANDED_SUB => '_',
                EXPANDED_SUP => '^',
                _ => c,
            })
            .collect()
    }

    fn warn_unknown(&mut self, name: &str) {
        if self.warned.insert(name.to_string()) {
            log::warn!("Unknown TeX macro: \\{}", name);
        }
    }

    fn arg(&mut self, delim: Delim, body: &str) -> Arg {
        Arg {
            delim,
            text: self.interpret(body),
        }
    }

    /// Consume the arguments of a known macro starting at `pos`.
    fn take_args(&mut self, src: &str, mut pos: usize, arity: Arity) -> (Vec<Arg>, usize) {
        let mut args = Vec::new();

        if arity.optional {
            if let Some(group) = scan::group_at(src, pos).filter(|g| g.delim == Delim::Bracket) {
                args.push(self.arg(Delim::Bracket, group.body));
                pos = group.end;
                if !group.terminated {
                    return (args, pos);
                }
            }
        }

        for _ in 0..arity.required {
            if let Some(group) = scan::group_at(src, pos).filter(|g| g.delim == Delim::Brace) {
                args.push(self.arg(Delim::Brace, group.body));
                pos = group.end;
                if !group.terminated {
                    break;
                }
            } else if let Some((token, end)) = scan::token_at(src, pos) {
                args.push(self.arg(Delim::Bare, token));
                pos = end;
            } else {
                break;
            }
        }
        (args, pos)
    }

    /// Consume every immediately following group, for unknown macros.
    fn take_groups(&mut self, src: &str, mut pos: usize) -> (Vec<Arg>, usize) {
        let mut args = Vec::new();
        while let Some(group) = scan::group_at(src, pos) {
            args.push(self.arg(group.delim, group.body));
            pos = group.end;
            if !group.terminated {
                break;
            }
        }
        (args, pos)
    }

    /// Transliterate eligible `_run` and `^run` literals.
    fn apply_scripts(&self, text: &str) -> String {
        if !text.contains(['_', '^']) {
            return text.to_string();
        }
        self.script_regex
            .replace_all(text, |caps: &Captures| {
                let run = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .map_or("", |m| m.as_str());
                let converted = if &caps[1] == "_" {
                    to_subscript(run)
                } else {
                    to_superscript(run)
                };
                converted.unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Replace recognized block environments with their collapsed rows.
    fn unwrap_environments(&self, source: &str) -> (String, bool) {
        let mut out = String::with_capacity(source.len());
        let mut unwrapped = false;
        let mut pos = 0;

        while let Some(caps) = self.begin_regex.captures_at(source, pos) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let env = name.as_str();
            if !BLOCK_ENVIRONMENTS.contains(&env.trim_end_matches('*')) {
                out.push_str(&source[pos..whole.end()]);
                pos = whole.end();
                continue;
            }

            let mut body_start = whole.end();
            if env.starts_with("alignat") {
                if let Some(columns) = scan::group_at(source, body_start) {
                    body_start = columns.end;
                }
            }
            let end_marker = format!("\\end{{{}}}", env);
            let (body, next) = match source[body_start..].find(&end_marker) {
                Some(i) => (
                    &source[body_start..body_start + i],
                    body_start + i + end_marker.len(),
                ),
                None => (&source[body_start..], source.len()),
            };

            out.push_str(&source[pos..whole.start()]);
            out.push('\n');
            out.push_str(&collapse_rows(body));
            out.push('\n');
            unwrapped = true;
            pos = next;
        }
        out.push_str(&source[pos..]);
        (out, unwrapped)
    }
}

/// Append already-interpreted text, masking its script markers.
fn push_expanded(out: &mut String, text: &str) {
    out.extend(text.chars().map(|c| match c {
        '_' => EXPANDED_SUB,
        '^' => EXPANDED_SUP,
        _ => c,
    }));
}

fn squeeze(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse tabular math rows: `\\` becomes a newline and column separators
/// `&` are dropped. Escaped `\&` is kept.
pub fn collapse_rows(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\\') => out.push('\n'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '&' => {}
            _ => out.push(c),
        }
    }
    out
}
