//! `# noqa` suppression comments.
//!
//! Supports the flake8 forms:
//! ```text
//! used(True)  # noqa
//! used(True)  # noqa: FBT003
//! def f(a: bool = True): ...  # NOQA: FBT001, FBT002
//! ```
//!
//! A listed code suppresses every code it is a prefix of, so `# noqa: FBT00`
//! silences all boolean-trap reasons on that line.

/// Parsed `# noqa` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoqaDirective {
    /// Bare `# noqa`: every code on the line is suppressed.
    All,
    /// `# noqa: CODE, ...`: only the listed codes (or code prefixes).
    Codes(Vec<String>),
}

impl NoqaDirective {
    /// Returns true if `code` is suppressed by this directive.
    #[must_use]
    pub fn suppresses(&self, code: &str) -> bool {
        match self {
            Self::All => true,
            Self::Codes(codes) => codes.iter().any(|listed| code.starts_with(listed.as_str())),
        }
    }
}

/// Checks whether a physical source line suppresses `code`.
#[must_use]
pub fn is_suppressed(line: &str, code: &str) -> bool {
    parse_noqa(line).is_some_and(|directive| directive.suppresses(code))
}

/// Finds a `# noqa` directive in the comment of a physical line.
///
/// A `#` inside a string literal does not start a comment. Strings are
/// tracked within the line only, so a line continuing a triple-quoted string
/// from above is read as code.
#[must_use]
pub fn parse_noqa(line: &str) -> Option<NoqaDirective> {
    let comment = &line[comment_start(line)?..];
    comment.match_indices('#').find_map(|(hash, _)| {
        let comment = comment[hash + 1..].trim_start();
        let keyword = comment.get(..4)?;
        if !keyword.eq_ignore_ascii_case("noqa") {
            return None;
        }
        Some(parse_codes(&comment[4..]))
    })
}

/// Byte offset of the `#` opening the line's comment.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    // (quote byte, triple-quoted)
    let mut open: Option<(u8, bool)> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match open {
            None if b == b'#' => return Some(i),
            None if b == b'"' || b == b'\'' => {
                let triple = bytes[i..].starts_with(&[b, b, b]);
                open = Some((b, triple));
                i += if triple { 3 } else { 1 };
                continue;
            }
            None => {}
            Some(_) if b == b'\\' => i += 1,
            Some((quote, false)) if b == quote => open = None,
            Some((quote, true)) if bytes[i..].starts_with(&[quote, quote, quote]) => {
                open = None;
                i += 3;
                continue;
            }
            Some(_) => {}
        }
        i += 1;
    }
    None
}

fn parse_codes(rest: &str) -> NoqaDirective {
    let Some(list) = rest.strip_prefix(':') else {
        return NoqaDirective::All;
    };

    let codes: Vec<String> = list
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .take_while(|token| is_code(token))
        .map(str::to_ascii_uppercase)
        .collect();

    if codes.is_empty() {
        NoqaDirective::All
    } else {
        NoqaDirective::Codes(codes)
    }
}

/// `FBT001`, `FBT00`, `E1`: letters followed by at least one digit.
fn is_code(token: &str) -> bool {
    let letters = token.chars().take_while(char::is_ascii_alphabetic).count();
    let digits = &token[letters..];
    letters > 0 && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
