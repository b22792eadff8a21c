/// String literal escaping and unescaping for the standard text format.
///
/// This module converts between:
/// - Runtime strings (e.g., "hello\n" with an actual newline character)
/// - Text-format literals (e.g., "hello\n" with a backslash-n sequence)
///
/// Location paths use their own, smaller escape set: only `|` and `\` are
/// escaped, since the path is delimited by bars.
use std::{borrow::Cow, fmt};
use thiserror::Error;

/// Errors that can occur when unescaping literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnescapeError {
    /// Invalid escape sequence (e.g., `\q`)
    #[error("invalid escape sequence '{seq}' at position {pos}")]
    InvalidEscape { pos: usize, seq: String },
    /// Invalid hex digit in Unicode escape
    #[error("invalid hex digit in '{seq}' at position {pos}")]
    InvalidHexDigit { pos: usize, seq: String },
    /// Incomplete Unicode escape (not enough digits)
    #[error("incomplete Unicode escape at position {pos}: expected {expected} digits, got {got}")]
    IncompleteUnicodeEscape {
        pos: usize,
        expected: usize,
        got: usize,
    },
    /// Invalid Unicode scalar value
    #[error("invalid Unicode scalar value U+{value:X} at position {pos}")]
    InvalidUnicodeScalar { pos: usize, value: u32 },
}

/// Writes `s` as a double-quoted string literal.
///
/// Escapes:
/// - `"` → `\"`
/// - `\` → `\\`
/// - newline, carriage return, tab and NUL → `\n`, `\r`, `\t`, `\0`
/// - other control characters → `\uNNNN`
pub fn escape_string(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Writes a location path between bars, escaping `|` and `\`.
pub fn escape_path(f: &mut impl fmt::Write, path: &str) -> fmt::Result {
    f.write_char('|')?;
    for ch in path.chars() {
        match ch {
            '|' => f.write_str("\\|")?,
            '\\' => f.write_str("\\\\")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('|')
}

/// Unescapes the contents of a string literal (without surrounding quotes).
///
/// Accepts exactly the escapes [`escape_string`] emits: `\n`, `\r`, `\t`,
/// `\0`, `\\`, `\"` and `\uNNNN`. Input without backslashes is returned
/// borrowed.
pub fn unescape_string(input: &str) -> Result<Cow<'_, str>, UnescapeError> {
    if !input.contains('\\') {
        return Ok(Cow::Borrowed(input));
    }

    let mut output = String::with_capacity(input.len());
    let mut chars = input.char_indices();

    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }

        match chars.next() {
            Some((_, 'n')) => output.push('\n'),
            Some((_, 'r')) => output.push('\r'),
            Some((_, 't')) => output.push('\t'),
            Some((_, '0')) => output.push('\0'),
            Some((_, '\\')) => output.push('\\'),
            Some((_, '"')) => output.push('"'),
            Some((upos, 'u')) => output.push(unicode_escape(&mut chars, pos, upos)?),
            Some((_, other)) => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: format!("\\{}", other),
                });
            }
            None => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: "\\".to_string(),
                });
            }
        }
    }

    Ok(Cow::Owned(output))
}

const UNICODE_DIGITS: usize = 4;

/// Reads the four hex digits following `\u`.
fn unicode_escape(
    chars: &mut std::str::CharIndices<'_>,
    pos: usize,
    upos: usize,
) -> Result<char, UnescapeError> {
    let hex_start = upos + 1;
    let mut hex_value = 0u32;

    for digit_count in 0..UNICODE_DIGITS {
        match chars.next() {
            Some((_, ch)) => match ch.to_digit(16) {
                Some(digit) => hex_value = (hex_value << 4) | digit,
                None => {
                    return Err(UnescapeError::InvalidHexDigit {
                        pos: hex_start,
                        seq: format!("\\u{}", ch),
                    });
                }
            },
            None => {
                return Err(UnescapeError::IncompleteUnicodeEscape {
                    pos,
                    expected: UNICODE_DIGITS,
                    got: digit_count,
                });
            }
        }
    }

    char::from_u32(hex_value).ok_or(UnescapeError::InvalidUnicodeScalar {
        pos,
        value: hex_value,
    })
}

/// Unescapes a location path (without surrounding bars).
pub fn unescape_path(input: &str) -> Result<Cow<'_, str>, UnescapeError> {
    if !input.contains('\\') {
        return Ok(Cow::Borrowed(input));
    }

    let mut output = String::with_capacity(input.len());
    let mut chars = input.char_indices();
    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, c @ ('|' | '\\'))) => output.push(c),
            Some((_, other)) => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: format!("\\{}", other),
                });
            }
            None => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: "\\".to_string(),
                });
            }
        }
    }
    Ok(Cow::Owned(output))
}
