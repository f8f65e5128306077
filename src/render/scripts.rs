//! Unicode subscript and superscript transliteration.
//!
//! Only a restricted alphabet has Unicode sub/superscript forms. A run is
//! transliterated when every character is in that alphabet; otherwise the
//! caller keeps the plain text.

const SUBSCRIPTS: &[(char, char)] = &[
    ('0', '₀'),
    ('1', '₁'),
    ('2', '₂'),
    ('3', '₃'),
    ('4', '₄'),
    ('5', '₅'),
    ('6', '₆'),
    ('7', '₇'),
    ('8', '₈'),
    ('9', '₉'),
    ('+', '₊'),
    ('-', '₋'),
    ('=', '₌'),
    ('(', '₍'),
    (')', '₎'),
    ('a', 'ₐ'),
    ('e', 'ₑ'),
    ('h', 'ₕ'),
    ('i', 'ᵢ'),
    ('j', 'ⱼ'),
    ('k', 'ₖ'),
    ('l', 'ₗ'),
    ('m', 'ₘ'),
    ('n', 'ₙ'),
    ('o', 'ₒ'),
    ('p', 'ₚ'),
    ('r', 'ᵣ'),
    ('s', 'ₛ'),
    ('t', 'ₜ'),
    ('u', 'ᵤ'),
    ('v', 'ᵥ'),
    ('x', 'ₓ'),
    (' ', ' '),
];

const SUPERSCRIPTS: &[(char, char)] = &[
    ('0', '⁰'),
    ('1', '¹'),
    ('2', '²'),
    ('3', '³'),
    ('4', '⁴'),
    ('5', '⁵'),
    ('6', '⁶'),
    ('7', '⁷'),
    ('8', '⁸'),
    ('9', '⁹'),
    ('+', '⁺'),
    ('-', '⁻'),
    ('=', '⁼'),
    ('(', '⁽'),
    (')', '⁾'),
    ('i', 'ⁱ'),
    ('n', 'ⁿ'),
    (' ', ' '),
];

fn transliterate(text: &str, table: &[(char, char)]) -> Option<String> {
    text.chars()
        .map(|c| {
            // U+2212 MINUS SIGN shows up in rendered math
            let c = if c == '\u{2212}' { '-' } else { c };
            table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
        })
        .collect()
}

/// Transliterate to Unicode subscripts, or `None` if any character has no
/// subscript form.
pub fn to_subscript(text: &str) -> Option<String> {
    transliterate(text, SUBSCRIPTS)
}

/// Transliterate to Unicode superscripts, or `None` if any character has no
/// superscript form.
pub fn to_superscript(text: &str) -> Option<String> {
    transliterate(text, SUPERSCRIPTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscript_digits() {
        assert_eq!(to_subscript("2").as_deref(), Some("₂"));
        assert_eq!(to_subscript("10").as_deref(), Some("₁₀"));
        assert_eq!(to_subscript("n+1").as_deref(), Some("ₙ₊₁"));
    }

    #[test]
    fn test_superscript() {
        assert_eq!(to_superscript("-1").as_deref(), Some("⁻¹"));
        assert_eq!(to_superscript("\u{2212}2").as_deref(), Some("⁻²"));
        assert_eq!(to_superscript("(n)").as_deref(), Some("⁽ⁿ⁾"));
    }

    #[test]
    fn test_ineligible_runs() {
        assert!(to_subscript("b").is_none());
        assert!(to_superscript("2x").is_none());
        assert!(to_superscript("th").is_none());
    }

    #[test]
    fn test_empty_run() {
        assert_eq!(to_subscript("").as_deref(), Some(""));
    }
}
