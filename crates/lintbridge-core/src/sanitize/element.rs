//! Attribute scanner for a single line of analyzer XML.
//!
//! The analyzer writes one attribute or one short element per line, so the
//! sanitizer works line by line and only needs to locate `name="value"`
//! pairs. Values are returned as raw, still-escaped text.

use std::borrow::Cow;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpan {
    pub name: Range<usize>,
    /// Between the quotes, exclusive.
    pub value: Range<usize>,
}

/// Locate every complete attribute on `line`. An unterminated quoted value
/// ends the scan.
pub fn scan_attributes(line: &str) -> Vec<AttrSpan> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let at_boundary = i == 0 || bytes[i - 1].is_ascii_whitespace() || bytes[i - 1] == b'<';
        if !at_boundary || !is_name_start(bytes[i]) {
            i += 1;
            continue;
        }

        let name_start = i;
        let mut name_end = i;
        while name_end < bytes.len() && is_name_char(bytes[name_end]) {
            name_end += 1;
        }

        let eq = skip_whitespace(bytes, name_end);
        if bytes.get(eq) == Some(&b'=') {
            let open = skip_whitespace(bytes, eq + 1);
            if let Some(&quote) = bytes.get(open).filter(|&&b| b == b'"' || b == b'\'') {
                let value_start = open + 1;
                match bytes[value_start..].iter().position(|&b| b == quote) {
                    Some(len) => {
                        spans.push(AttrSpan {
                            name: name_start..name_end,
                            value: value_start..value_start + len,
                        });
                        i = value_start + len + 1;
                        continue;
                    }
                    None => break,
                }
            }
        }
        i = name_end;
    }

    spans
}

/// Replace the values of the attributes called `names` with `rewrite(value)`.
/// All other bytes of the line are kept as they were.
pub fn rewrite_attributes<'a, F>(line: &'a str, names: &[&str], mut rewrite: F) -> Cow<'a, str>
where
    F: FnMut(&str) -> String,
{
    let mut out = String::new();
    let mut copied = 0;

    for span in scan_attributes(line) {
        if !names.contains(&&line[span.name.clone()]) {
            continue;
        }
        let value = &line[span.value.clone()];
        let replaced = rewrite(value);
        if replaced == value {
            continue;
        }
        out.push_str(&line[copied..span.value.start]);
        out.push_str(&replaced);
        copied = span.value.end;
    }

    if copied == 0 {
        return Cow::Borrowed(line);
    }
    out.push_str(&line[copied..]);
    Cow::Owned(out)
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'-' | b'.')
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}
