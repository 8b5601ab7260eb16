//! Minimal XML emitter for the analyzer's model files and the JUnit report.
//!
//! Output layout is fixed: one element per line, two-space indentation,
//! attributes in insertion order. Absent optional attributes are skipped
//! rather than written as empty strings.

use std::borrow::Cow;

pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// One start tag: a name plus ordered attributes.
#[derive(Debug, Clone)]
pub struct Element<'a> {
    name: &'a str,
    attrs: Vec<(&'a str, String)>,
}

impl<'a> Element<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'a str, value: impl ToString) -> Self {
        self.attrs.push((key, value.to_string()));
        self
    }

    pub fn attr_opt<V: ToString>(self, key: &'a str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.attr(key, v),
            None => self,
        }
    }

    fn start_tag(&self) -> String {
        let mut tag = format!("<{}", self.name);
        for (key, value) in &self.attrs {
            tag.push(' ');
            tag.push_str(key);
            tag.push_str("=\"");
            tag.push_str(&escape_attr(value));
            tag.push('"');
        }
        tag
    }
}

#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_declaration() -> Self {
        let mut writer = Self::new();
        writer.line(DECLARATION);
        writer
    }

    /// `<name ...>`; must be balanced by [`XmlWriter::close`].
    pub fn open(&mut self, element: Element<'_>) {
        let tag = element.start_tag() + ">";
        self.line(&tag);
        self.depth += 1;
    }

    /// `<name ... />`
    pub fn empty(&mut self, element: Element<'_>) {
        let tag = element.start_tag() + " />";
        self.line(&tag);
    }

    pub fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{name}>"));
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\n' | '\r' | '\t'))
    {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
