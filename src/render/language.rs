//! Language codes and their default text directionality.

use std::fmt;

/// Text flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left
    Rtl,
}

impl Direction {
    /// Parse a `dir` attribute value.
    ///
    /// `auto` and unknown values yield `None` and leave the current
    /// directionality unchanged.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ltr" => Some(Direction::Ltr),
            "rtl" => Some(Direction::Rtl),
            _ => None,
        }
    }

    /// Unicode isolate mark opening a run in this direction.
    pub fn isolate(self) -> char {
        match self {
            Direction::Ltr => '\u{2066}',
            Direction::Rtl => '\u{2067}',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        })
    }
}

/// Closes the innermost directional isolate.
pub const POP_DIRECTIONAL_ISOLATE: char = '\u{2069}';

/// Languages written right to left.
const RTL_LANGUAGES: &[&str] = &[
    "ar", "arc", "arz", "azb", "bcc", "bqi", "ckb", "dv", "fa", "glk", "he", "khw", "ks",
    "lrc", "mzn", "pnb", "ps", "sd", "ug", "ur", "yi",
];

/// Default directionality for a language code.
///
/// Region and script subtags are ignored except for an explicit `arab`
/// script, which always reads right to left.
pub fn default_direction(lang: &str) -> Direction {
    let lang = lang.trim().to_ascii_lowercase();
    let mut subtags = lang.split(['-', '_']);
    let primary = subtags.next().unwrap_or_default();
    if RTL_LANGUAGES.contains(&primary) || subtags.any(|s| s == "arab") {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}
