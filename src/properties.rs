//! Flat `key=value` property file codec.
//!
//! Reading accepts the classic property-list syntax:
//! - blank lines and lines starting with `#` or `!` are skipped
//! - the key ends at the first unescaped `=`, `:` or whitespace
//! - `\t`, `\n`, `\r`, `\f`, `\uXXXX` and `\<any>` escapes are decoded
//! - an odd number of trailing backslashes joins the next physical line,
//!   dropping its leading whitespace
//!
//! Writing always emits `key=value`, sorted by key, preceded by a comment
//! header and a timestamp line. Non-ASCII text is written as plain UTF-8.

use std::collections::BTreeMap;

use thiserror::Error;

pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed \\uXXXX escape")]
    MalformedUnicode { line: usize },

    #[error("line {line}: unpaired surrogate in \\u escape")]
    UnpairedSurrogate { line: usize },
}

/// Parse property-file text into a map. Later duplicates of a key win.
pub fn parse(text: &str) -> Result<Properties, ParseError> {
    let mut props = Properties::new();
    for (line_no, logical) in logical_lines(text) {
        let (raw_key, raw_value) = split_entry(&logical);
        let key = unescape(raw_key, line_no)?;
        let value = unescape(raw_value, line_no)?;
        props.insert(key, value);
    }
    Ok(props)
}

/// Render a map in property-file syntax.
///
/// `comment` may span several lines; each becomes its own `#` line.
pub fn render(props: &Properties, comment: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(comment) = comment {
        for line in comment.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str("# ");
    out.push_str(&chrono::Local::now().to_rfc2822());
    out.push('\n');
    for (key, value) in props {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

// ── reading ─────────────────────────────────────────────────────────────────

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Join continuation lines and drop comments. Yields `(1-based first line, text)`.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line = raw.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = String::new();
        let mut current = line;
        loop {
            if !continues(current) {
                logical.push_str(current);
                break;
            }
            logical.push_str(&current[..current.len() - 1]);
            match lines.next() {
                Some((_, next)) => current = next.trim_start_matches(is_blank),
                None => break,
            }
        }
        out.push((idx + 1, logical));
    }
    out
}

/// Split a logical line into its still-escaped key and value parts.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start_matches(is_blank)),
            c if is_blank(c) => {
                let rest = line[i..].trim_start_matches(is_blank);
                let rest = rest
                    .strip_prefix(|c: char| c == '=' || c == ':')
                    .unwrap_or(rest)
                    .trim_start_matches(is_blank);
                return (&line[..i], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

fn read_hex_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u32, ParseError> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.chars().count() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError::MalformedUnicode { line });
    }
    u32::from_str_radix(&hex, 16).map_err(|_| ParseError::MalformedUnicode { line })
}

fn unescape(raw: &str, line: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_hex_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(ParseError::UnpairedSurrogate { line });
                    }
                    let low = read_hex_unit(&mut chars, line)?;
                    char::decode_utf16([unit as u16, low as u16])
                        .next()
                        .and_then(Result::ok)
                } else {
                    char::from_u32(unit)
                };
                out.push(decoded.ok_or(ParseError::UnpairedSurrogate { line })?);
            }
            Some(other) => out.push(other),
            // A lone trailing backslash at end of input carries nothing.
            None => {}
        }
    }
    Ok(out)
}

// ── writing ─────────────────────────────────────────────────────────────────

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}
