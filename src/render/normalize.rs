//! Whitespace and quote cleanup for raw text runs.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Check whether a character is whitespace a line may break at.
///
/// Non-breaking spaces are whitespace to Unicode but glue words together.
pub fn is_breaking_space(c: char) -> bool {
    c.is_whitespace() && c != '\u{00A0}' && c != '\u{202F}'
}

/// Text normalization applied to every text node before layout.
///
/// Normalization is idempotent: normalizing normalized text is a no-op.
pub struct TextNormalizer {
    whitespace_regex: Regex,
    invisible: Vec<char>,
    quote_map: Vec<(char, char)>,
}

impl TextNormalizer {
    /// Create a normalizer.
    pub fn new() -> Self {
        Self {
            whitespace_regex: Regex::new(r"[^\S\x{00A0}\x{202F}]+").unwrap(),
            invisible: vec![
                '\u{00AD}', // soft hyphen
                '\u{200B}', // zero width space
                '\u{FEFF}', // zero width no-break space
            ],
            quote_map: vec![
                ('\u{2018}', '\''), // ‘
                ('\u{2019}', '\''), // ’
                ('\u{201A}', '\''), // ‚
                ('\u{201B}', '\''), // ‛
                ('\u{201C}', '"'),  // “
                ('\u{201D}', '"'),  // ”
                ('\u{201E}', '"'),  // „
                ('\u{201F}', '"'),  // ‟
            ],
        }
    }

    /// Normalize a raw text run.
    ///
    /// Leading and trailing whitespace is collapsed but kept, since it
    /// separates the run from neighbouring inline content.
    pub fn normalize(&self, text: &str) -> String {
        let composed: String = text
            .chars()
            .filter(|c| !self.invisible.contains(c))
            .nfc()
            .map(|c| {
                self.quote_map
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map_or(c, |(_, to)| *to)
            })
            .collect();

        self.whitespace_regex.replace_all(&composed, " ").into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_breaking_space)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
