//! Reader for `.properties` resource files.
//!
//! Supports the usual format: `key=value`, `key:value` and `key value`
//! pairs, `#` / `!` comment lines, backslash line continuation and the
//! `\t \n \r \f \uXXXX` escapes. Any other escaped character stands for
//! itself, which is how separators and spaces end up inside keys.

use crate::resolver::TranslationTable;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PropertiesError {
    #[error("malformed \\uXXXX escape on line {line}")]
    InvalidUnicodeEscape { line: usize },
}

/// Decodes file contents as UTF-8, falling back to ISO-8859-1 for files
/// written in the older single-byte encoding.
pub fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Parses the text of a `.properties` file. Later duplicates of a key
/// replace the earlier value but keep its position.
pub fn parse(text: &str) -> Result<TranslationTable, PropertiesError> {
    let mut table = TranslationTable::new();
    for (line, logical) in logical_lines(text) {
        let (key, value) = split_pair(&logical);
        let key = unescape(key, line)?;
        let value = unescape(value, line)?;
        table.insert(key, value);
    }
    Ok(table)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Joins continued lines and drops blanks and comments. Yields the
/// 1-based number of the first physical line along with the text.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, raw) in text.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim_start_matches(is_whitespace);

        let (number, mut buffer) = match current.take() {
            Some(pending) => pending,
            None => {
                if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        let trailing_backslashes = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        if trailing_backslashes % 2 == 1 {
            buffer.push_str(&trimmed[..trimmed.len() - 1]);
            current = Some((number, buffer));
        } else {
            buffer.push_str(trimmed);
            lines.push((number, buffer));
        }
    }

    // A continuation on the last line of the file just ends the entry.
    if let Some(pending) = current {
        lines.push(pending);
    }
    lines
}

/// Splits a logical line at the first unescaped separator. The raw key and
/// value are returned still escaped.
fn split_pair(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_whitespace(c) {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_whitespace);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_whitespace);
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut high_surrogate: Option<u16> = None;

    while let Some(c) = chars.next() {
        let unit = if c == '\\' {
            match chars.next() {
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                        return Err(PropertiesError::InvalidUnicodeEscape { line });
                    }
                    Some(
                        u16::from_str_radix(&hex, 16)
                            .map_err(|_| PropertiesError::InvalidUnicodeEscape { line })?,
                    )
                }
                Some('t') => Some('\t' as u16),
                Some('n') => Some('\n' as u16),
                Some('r') => Some('\r' as u16),
                Some('f') => Some(0x0c),
                Some(other) => {
                    flush_surrogate(&mut out, &mut high_surrogate);
                    out.push(other);
                    None
                }
                None => None,
            }
        } else {
            flush_surrogate(&mut out, &mut high_surrogate);
            out.push(c);
            None
        };

        let Some(unit) = unit else { continue };
        match (high_surrogate.take(), unit) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let units = [high, unit];
                out.extend(char::decode_utf16(units).map(|r| r.unwrap_or('\u{FFFD}')));
            }
            (pending, 0xD800..=0xDBFF) => {
                if pending.is_some() {
                    out.push('\u{FFFD}');
                }
                high_surrogate = Some(unit);
            }
            (pending, _) => {
                if pending.is_some() {
                    out.push('\u{FFFD}');
                }
                out.push(char::from_u32(u32::from(unit)).unwrap_or('\u{FFFD}'));
            }
        }
    }

    flush_surrogate(&mut out, &mut high_surrogate);
    Ok(out)
}

// An unpaired high surrogate becomes the replacement character.
fn flush_surrogate(out: &mut String, high_surrogate: &mut Option<u16>) {
    if high_surrogate.take().is_some() {
        out.push('\u{FFFD}');
    }
}
