//! Pass/fail policy inputs.
//!
//! [`ClassificationPolicy`] comes from the build rule. [`BaselineExemptions`]
//! is versioned data tied to the analyzer's wording: the two baseline status
//! issues are only accepted while their message still reads the way the
//! analyzer version the table was written against phrases it.

use serde::{Deserialize, Serialize};

/// Analyzer release whose wording [`BaselineExemptions::default`] matches.
pub const EXEMPTIONS_ANALYZER_VERSION: &str = "8.x";

/// Issue reported when baseline entries suppressed findings.
pub const BASELINE_FILTERED_ID: &str = "LintBaseline";

/// Issue reported when baseline entries no longer reproduce.
pub const BASELINE_FIXED_ID: &str = "LintBaselineFixed";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationPolicy {
    pub fail_on_warnings: bool,
    pub fail_on_information: bool,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            fail_on_warnings: true,
            fail_on_information: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExemptIssue {
    pub id: String,
    /// Canonical substring of the issue's message. A message without it is
    /// treated as an anomaly and fails.
    pub expected_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaselineExemptions {
    pub analyzer_version: String,
    pub entries: Vec<ExemptIssue>,
}

impl BaselineExemptions {
    pub fn none() -> Self {
        Self {
            analyzer_version: EXEMPTIONS_ANALYZER_VERSION.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&ExemptIssue> {
        self.entries.iter().find(|e| e.id == id)
    }
}

impl Default for BaselineExemptions {
    fn default() -> Self {
        let entry = |id: &str, expected: &str| ExemptIssue {
            id: id.to_string(),
            expected_message: expected.to_string(),
        };

        Self {
            analyzer_version: EXEMPTIONS_ANALYZER_VERSION.to_string(),
            entries: vec![
                entry(BASELINE_FILTERED_ID, "filtered out because"),
                entry(BASELINE_FIXED_ID, "perhaps they have been fixed"),
            ],
        }
    }
}
