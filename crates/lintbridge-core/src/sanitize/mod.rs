//! Removal of sandbox-specific path prefixes from analyzer output.
//!
//! Findings and baselines are build outputs and must not depend on which
//! sandbox instance produced them. Every `file` and `message` attribute value
//! is rewritten:
//!
//! 1. strip the temp directory prefix, if one is known
//! 2. strip leading `.` and `/` characters (`../../` traversal)
//! 3. remove every match of the [`ExecRootPattern`]
//!
//! Sanitizing already sanitized text is a no-op.

pub mod element;
pub mod pattern;

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::env::Env;
use crate::{Error, Result};

pub use pattern::ExecRootPattern;

/// Attributes whose values may embed sandbox paths.
pub const PATH_ATTRIBUTES: [&str; 2] = ["file", "message"];

#[derive(Debug, Clone)]
pub struct Sanitizer {
    pattern: ExecRootPattern,
    temp_prefix: Option<String>,
}

impl Sanitizer {
    pub fn new(pattern: ExecRootPattern, temp_prefix: Option<String>) -> Self {
        Self {
            pattern,
            temp_prefix: temp_prefix.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_env(env: &dyn Env) -> Self {
        let working_dir = env.working_directory();
        let pattern = ExecRootPattern::derive(&working_dir.to_string_lossy());
        debug!(%pattern, wildcarded = pattern.is_wildcarded(), "derived exec root pattern");

        let temp_prefix = env
            .temp_directory()
            .map(|t| t.to_string_lossy().into_owned());
        Self::new(pattern, temp_prefix)
    }

    pub fn pattern(&self) -> &ExecRootPattern {
        &self.pattern
    }

    pub fn sanitize_value(&self, value: &str) -> String {
        let mut current = value.to_string();
        loop {
            let next = self.sanitize_value_once(&current);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn sanitize_value_once(&self, value: &str) -> String {
        let value = match &self.temp_prefix {
            Some(prefix) => value.strip_prefix(prefix.as_str()).unwrap_or(value),
            None => value,
        };
        let value = value.trim_start_matches(['.', '/']);
        self.pattern.strip_all(value)
    }

    pub fn sanitize_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        element::rewrite_attributes(line, &PATH_ATTRIBUTES, |value| self.sanitize_value(value))
    }

    /// Sanitize every line, keeping line terminators as they were.
    pub fn sanitize_text(&self, text: &str) -> String {
        text.split_inclusive('\n')
            .map(|line| self.sanitize_line(line))
            .collect()
    }

    /// Sanitize `input` into `output`. The two may be the same file.
    pub fn sanitize_file(&self, input: &Path, output: &Path) -> Result<()> {
        let text = fs::read_to_string(input).map_err(|e| Error::io("read", input, e))?;
        let sanitized = self.sanitize_text(&text);
        fs::write(output, sanitized).map_err(|e| Error::io("write", output, e))?;
        debug!(input = %input.display(), output = %output.display(), "sanitized analyzer output");
        Ok(())
    }
}
