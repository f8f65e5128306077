//! Lexical scanning for macro names and delimited arguments.

/// Argument delimiter kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    /// `{ ... }`
    Brace,
    /// `[ ... ]`
    Bracket,
    /// A single undelimited token
    Bare,
}

impl Delim {
    /// Opening and closing text for this delimiter.
    pub fn pair(self) -> (&'static str, &'static str) {
        match self {
            Delim::Brace => ("{", "}"),
            Delim::Bracket => ("[", "]"),
            Delim::Bare => ("", ""),
        }
    }
}

/// A macro invocation found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroName<'a> {
    /// Byte offset of the introducing backslash
    pub start: usize,
    /// Name without the backslash
    pub name: &'a str,
    /// Byte offset just past the name
    pub end: usize,
}

/// A delimited argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    /// Delimiter kind
    pub delim: Delim,
    /// Text between the delimiters
    pub body: &'a str,
    /// Byte offset just past the closing delimiter
    pub end: usize,
    /// False when no matching close was found and the body ran to the end
    pub terminated: bool,
}

/// Find the next macro name at or after `from`.
///
/// A name is either a run of ASCII letters or exactly one other character.
/// A trailing lone backslash is not a macro.
pub fn next_macro(src: &str, from: usize) -> Option<MacroName<'_>> {
    let start = from + src[from..].find('\\')?;
    let after = start + 1;
    let rest = &src[after..];
    let letters = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let len = if letters > 0 {
        letters
    } else {
        rest.chars().next()?.len_utf8()
    };
    Some(MacroName {
        start,
        name: &src[after..after + len],
        end: after + len,
    })
}

fn skip_spaces(src: &str, pos: usize) -> usize {
    pos + src[pos..].len() - src[pos..].trim_start_matches([' ', '\t']).len()
}

/// Read a brace or bracket group starting at `pos` (after optional spaces).
///
/// The close is found by counting nesting depth over all of `{}[]` and
/// skipping escaped characters. An unterminated group takes the rest of the
/// source as its body.
pub fn group_at(src: &str, pos: usize) -> Option<Group<'_>> {
    let open = skip_spaces(src, pos);
    let delim = match src[open..].chars().next()? {
        '{' => Delim::Brace,
        '[' => Delim::Bracket,
        _ => return None,
    };

    let body_start = open + 1;
    let mut depth = 1usize;
    let mut chars = src[body_start..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(Group {
                        delim,
                        body: &src[body_start..body_start + i],
                        end: body_start + i + 1,
                        terminated: true,
                    });
                }
            }
            _ => {}
        }
    }

    Some(Group {
        delim,
        body: &src[body_start..],
        end: src.len(),
        terminated: false,
    })
}

/// Read a single undelimited token at `pos` (after optional spaces): a
/// macro name with its backslash, or one character.
///
/// Closing delimiters are never taken as tokens.
pub fn token_at(src: &str, pos: usize) -> Option<(&str, usize)> {
    let start = skip_spaces(src, pos);
    let c = src[start..].chars().next()?;
    if matches!(c, '}' | ']' | '{' | '[') {
        return None;
    }
    if c == '\\' {
        let name = next_macro(src, start)?;
        return Some((&src[start..name.end], name.end));
    }
    let end = start + c.len_utf8();
    Some((&src[start..end], end))
}

/// Split a source into lines at newlines outside any brace group.
///
/// Newlines inside a group become spaces; an escaped character is copied
/// through, with an escaped newline read as a space.
pub fn split_lines(src: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut depth = 0usize;
    let mut chars = src.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                line.push(c);
                match chars.next() {
                    Some('\n') => line.push(' '),
                    Some(next) => line.push(next),
                    None => {}
                }
            }
            '{' => {
                depth += 1;
                line.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                line.push(c);
            }
            '\n' if depth == 0 => lines.push(std::mem::take(&mut line)),
            '\n' => line.push(' '),
            _ => line.push(c),
        }
    }
    lines.push(line);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_only_outside_groups() {
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("f{x\ny}\nz"), vec!["f{x y}", "z"]);
        assert_eq!(split_lines("\\{\nx"), vec!["\\{", "x"]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn test_next_macro_letters_and_symbols() {
        let m = next_macro(r"a+\alpha2", 0).unwrap();
        assert_eq!((m.start, m.name, m.end), (2, "alpha", 8));

        let m = next_macro(r"x\,y", 0).unwrap();
        assert_eq!(m.name, ",");

        let m = next_macro(r"a\\b", 0).unwrap();
        assert_eq!((m.name, m.end), ("\\", 3));

        assert!(next_macro("plain", 0).is_none());
        assert!(next_macro("end\\", 0).is_none());
    }

    #[test]
    fn test_group_nested_depth() {
        let src = "{a{b[c]}d}rest";
        let g = group_at(src, 0).unwrap();
        assert_eq!(g.body, "a{b[c]}d");
        assert_eq!(&src[g.end..], "rest");
        assert!(g.terminated);
    }

    #[test]
    fn test_group_bracket_then_brace() {
        let src = "[3]{x}";
        let index = group_at(src, 0).unwrap();
        assert_eq!((index.delim, index.body), (Delim::Bracket, "3"));
        let radicand = group_at(src, index.end).unwrap();
        assert_eq!((radicand.delim, radicand.body), (Delim::Brace, "x"));
        assert_eq!(radicand.end, src.len());
    }

    #[test]
    fn test_group_skips_escaped_delimiters() {
        let g = group_at(r"{\{a\}}", 0).unwrap();
        assert_eq!(g.body, r"\{a\}");
    }

    #[test]
    fn test_unterminated_group_takes_rest() {
        let g = group_at("{x+{y", 0).unwrap();
        assert_eq!(g.body, "x+{y");
        assert_eq!(g.end, 5);
        assert!(!g.terminated);
    }

    #[test]
    fn test_no_group() {
        assert!(group_at("x{y}", 0).is_none());
        assert!(group_at("", 0).is_none());
        assert_eq!(group_at("  {y}", 0).unwrap().body, "y");
    }

    #[test]
    fn test_token_at() {
        assert_eq!(token_at("12", 0), Some(("1", 1)));
        assert_eq!(token_at(r" \pi x", 0), Some((r"\pi", 4)));
        assert_eq!(token_at("}", 0), None);
        assert_eq!(token_at("", 0), None);
    }
}
