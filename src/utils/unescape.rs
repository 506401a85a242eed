//! Literal string unescaping
//!
//! Descriptor values such as `file="page 0.png"` are quoted string literals.
//! This resolves them to their literal content without evaluating anything.

/// Why a quoted literal could not be unescaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnescapeError {
    /// Opening quote without a matching closing quote
    Unterminated,
    /// Closing quote followed by more characters
    TrailingCharacters,
    /// Backslash followed by an unknown escape character
    UnknownEscape(char),
    /// Malformed \x or \u sequence
    InvalidCodePoint(String),
}

impl std::fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unterminated => write!(f, "unterminated string literal"),
            Self::TrailingCharacters => write!(f, "characters after closing quote"),
            Self::UnknownEscape(c) => write!(f, "unknown escape sequence \\{}", c),
            Self::InvalidCodePoint(s) => write!(f, "invalid code point escape {}", s),
        }
    }
}

/// Unescape a possibly quoted literal.
///
/// A value wrapped in `"` or `'` has the quotes stripped and the standard
/// escape sequences resolved:
/// `\\ \" \' \/ \n \r \t \0 \b \f \v \xHH \uXXXX \u{X..}`.
/// A value without surrounding quotes is returned as-is.
pub fn unescape_literal(raw: &str) -> Result<String, UnescapeError> {
    let quote = match raw.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Ok(raw.to_string()),
    };

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw[1..].chars();
    loop {
        let c = chars.next().ok_or(UnescapeError::Unterminated)?;
        if c == quote {
            break;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next().ok_or(UnescapeError::Unterminated)?;
        let resolved = match esc {
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            '/' => '/',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            'x' => {
                let digits: String = chars.by_ref().take(2).collect();
                hex_char(&digits, 2)?
            }
            'u' => {
                let rest = chars.as_str();
                if let Some(braced) = rest.strip_prefix('{') {
                    let end = braced
                        .find('}')
                        .ok_or_else(|| UnescapeError::InvalidCodePoint(format!("\\u{}", rest)))?;
                    let digits = braced[..end].to_string();
                    // Skip '{', digits and '}'
                    for _ in 0..digits.chars().count() + 2 {
                        chars.next();
                    }
                    if digits.is_empty() || digits.len() > 6 {
                        return Err(UnescapeError::InvalidCodePoint(format!("\\u{{{}}}", digits)));
                    }
                    hex_char(&digits, digits.len())?
                } else {
                    let digits: String = chars.by_ref().take(4).collect();
                    hex_char(&digits, 4)?
                }
            }
            other => return Err(UnescapeError::UnknownEscape(other)),
        };
        out.push(resolved);
    }

    if chars.next().is_some() {
        return Err(UnescapeError::TrailingCharacters);
    }
    Ok(out)
}

fn hex_char(digits: &str, expected_len: usize) -> Result<char, UnescapeError> {
    let invalid = || UnescapeError::InvalidCodePoint(digits.to_string());
    if digits.len() != expected_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    char::from_u32(value).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_quoted() {
        assert_eq!(unescape_literal("\"font_0.png\"").unwrap(), "font_0.png");
        assert_eq!(unescape_literal("'font_0.png'").unwrap(), "font_0.png");
    }

    #[test]
    fn test_unquoted_passthrough() {
        assert_eq!(unescape_literal("font_0.png").unwrap(), "font_0.png");
        assert_eq!(unescape_literal("").unwrap(), "");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(unescape_literal(r#""a\\b.png""#).unwrap(), "a\\b.png");
        assert_eq!(unescape_literal(r#""say \"hi\"""#).unwrap(), "say \"hi\"");
        assert_eq!(unescape_literal(r#""tab\there""#).unwrap(), "tab\there");
        assert_eq!(unescape_literal(r#""\x41B\u{1F600}""#).unwrap(), "AB\u{1F600}");
    }

    #[test]
    fn test_expression_text_is_not_evaluated() {
        // Looks like code, stays literal
        assert_eq!(
            unescape_literal(r#""a" + "b""#),
            Err(UnescapeError::TrailingCharacters)
        );
        assert_eq!(
            unescape_literal(r#""${alert(1)}.png""#).unwrap(),
            "${alert(1)}.png"
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(unescape_literal("\"open"), Err(UnescapeError::Unterminated));
        assert_eq!(unescape_literal(r#""bad\q""#), Err(UnescapeError::UnknownEscape('q')));
        assert!(matches!(
            unescape_literal(r#""\xZZ""#),
            Err(UnescapeError::InvalidCodePoint(_))
        ));
        assert!(matches!(
            unescape_literal(r#""\uD800""#),
            Err(UnescapeError::InvalidCodePoint(_))
        ));
    }
}
