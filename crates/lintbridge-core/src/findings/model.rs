use serde::{Deserialize, Serialize};

/// Analyzer severity levels, most severe first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl Severity {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "Fatal" => Some(Severity::Fatal),
            "Error" => Some(Severity::Error),
            "Warning" => Some(Severity::Warning),
            "Information" => Some(Severity::Information),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// One reported issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub summary: String,
    pub explanation: String,
    pub location: Location,
    /// Source lines echoed by the analyzer: the offending line and, usually,
    /// a caret marker underneath it.
    pub error_lines: Vec<String>,
}
