//! Escaping rules for keys and values written to a `.properties` file.
//!
//! Whitespace control characters, key separators and comment markers are
//! always escaped. Spaces are escaped everywhere in a key, but only at the
//! start of a value. Anything outside printable ASCII is written as `\uXXXX`.
//! A backslash is written as is, unless [`escape_symmetric`] is used.

use std::fmt::Write;
use std::str::Chars;

use unic_ucd::GeneralCategory;

/// Returns a string that is safe to use as either a key or value in a
/// property file.
pub fn escape(s: &str, key: bool) -> String {
    escape_inner(s, key, false)
}

/// Like [`escape`], but also writes a backslash as `\\`, so that
/// [`unescape`] gives back exactly `s`.
pub fn escape_symmetric(s: &str, key: bool) -> String {
    escape_inner(s, key, true)
}

fn escape_inner(s: &str, key: bool, backslash: bool) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut leading = true;

    for ch in s.chars() {
        let mut was_space = false;

        match ch {
            '\t' => buf.push_str(r"\t"),
            '\n' => buf.push_str(r"\n"),
            '\r' => buf.push_str(r"\r"),
            '\x0c' => buf.push_str(r"\f"),
            ' ' if key || leading => {
                buf.push_str(r"\ ");
                was_space = true;
            }
            ' ' => buf.push(' '),
            ':' => buf.push_str(r"\:"),
            '=' => buf.push_str(r"\="),
            '#' => buf.push_str(r"\#"),
            '!' => buf.push_str(r"\!"),
            '\\' if backslash => buf.push_str(r"\\"),
            ch if !is_printable(ch) || ch as u32 > 126 => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    // Writing into a String never fails.
                    let _ = write!(buf, "\\u{:04x}", unit);
                }
            }
            ch => buf.push(ch),
        }

        if !was_space {
            leading = false;
        }
    }

    buf
}

#[inline(always)]
pub fn escape_key(s: &str) -> String {
    escape(s, true)
}

#[inline(always)]
pub fn escape_value(s: &str) -> String {
    escape(s, false)
}

/// Reverses [`escape`]. Unknown escapes decode to the escaped character. A
/// `\u` without four hex digits and a trailing lone backslash are kept
/// verbatim; an unpaired surrogate becomes U+FFFD.
pub fn unescape(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            buf.push(ch);
            continue;
        }

        match chars.next() {
            Some('t') => buf.push('\t'),
            Some('n') => buf.push('\n'),
            Some('r') => buf.push('\r'),
            Some('f') => buf.push('\x0c'),
            Some('u') => match read_hex4(&mut chars) {
                Some(high @ 0xd800..=0xdbff) => {
                    let mut lookahead = chars.clone();
                    let low = match (lookahead.next(), lookahead.next()) {
                        (Some('\\'), Some('u')) => read_hex4(&mut lookahead),
                        _ => None,
                    };
                    match low {
                        Some(low @ 0xdc00..=0xdfff) => {
                            chars = lookahead;
                            let c = 0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00);
                            buf.push(std::char::from_u32(c).unwrap_or('\u{fffd}'));
                        }
                        _ => buf.push('\u{fffd}'),
                    }
                }
                Some(unit) => buf.push(std::char::from_u32(unit).unwrap_or('\u{fffd}')),
                None => buf.push_str(r"\u"),
            },
            Some(other) => buf.push(other),
            None => buf.push('\\'),
        }
    }

    buf
}

/// Consumes exactly four hex digits, leaving the iterator untouched otherwise.
fn read_hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let mut lookahead = chars.clone();
    let mut value = 0u32;
    for _ in 0..4 {
        value = value * 16 + lookahead.next()?.to_digit(16)?;
    }
    *chars = lookahead;
    Some(value)
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    let cat = GeneralCategory::of(ch);
    !(cat.is_other() || cat.is_separator())
}
