//! Classification of analyzer findings into a pass/fail verdict.
//!
//! Responsibilities:
//! - Decide per finding whether it fails the build
//! - Group failing findings by issue id for the report
//! - Preserve the analyzer's ordering so reports are reproducible
//!
//! Non-responsibilities:
//! - Parsing analyzer output (handled in `findings::parse`)
//! - Rendering reports (handled in `report`)
//!
//! Default policy:
//!
//!   - Fatal, Error  → always failing
//!   - Warning       → failing iff `fail_on_warnings`
//!   - Information   → failing iff `fail_on_information`
//!
//! Baseline status issues listed in [`BaselineExemptions`] bypass the
//! default policy: they pass while their message contains the expected
//! text, and fail otherwise since that means baseline bookkeeping itself
//! misbehaved.

use serde::Serialize;

use crate::findings::model::{Finding, Severity};
use crate::rules::policy::{BaselineExemptions, ClassificationPolicy};
use crate::util::deterministic::group_in_order;

/// Failing findings sharing one issue id.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IssueSuite {
    pub id: String,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClassifiedResult {
    pub passed: bool,
    /// Ordered by the first appearance of each id.
    pub suites: Vec<IssueSuite>,
}

impl ClassifiedResult {
    pub fn failure_count(&self) -> usize {
        self.suites.iter().map(|s| s.findings.len()).sum()
    }
}

/// Classify with the default baseline exemptions.
pub fn classify(findings: &[Finding], policy: &ClassificationPolicy) -> ClassifiedResult {
    classify_with(findings, policy, &BaselineExemptions::default())
}

pub fn classify_with(
    findings: &[Finding],
    policy: &ClassificationPolicy,
    exemptions: &BaselineExemptions,
) -> ClassifiedResult {
    let failing = findings
        .iter()
        .filter(|f| is_failing(f, policy, exemptions))
        .cloned();

    let suites: Vec<IssueSuite> = group_in_order(failing, |f| f.id.clone())
        .into_iter()
        .map(|(id, findings)| IssueSuite { id, findings })
        .collect();

    ClassifiedResult {
        passed: suites.is_empty(),
        suites,
    }
}

fn is_failing(
    finding: &Finding,
    policy: &ClassificationPolicy,
    exemptions: &BaselineExemptions,
) -> bool {
    if let Some(exempt) = exemptions.find(&finding.id) {
        return !finding.message.contains(&exempt.expected_message);
    }

    match finding.severity {
        Severity::Fatal | Severity::Error => true,
        Severity::Warning => policy.fail_on_warnings,
        Severity::Information => policy.fail_on_information,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::model::Location;
    use crate::rules::policy::{BASELINE_FILTERED_ID, BASELINE_FIXED_ID, ExemptIssue};

    fn finding(id: &str, severity: Severity, message: &str) -> Finding {
        Finding {
            id: id.into(),
            severity,
            message: message.into(),
            summary: "s".into(),
            explanation: "e".into(),
            location: Location::default(),
            error_lines: vec![],
        }
    }

    fn lenient() -> ClassificationPolicy {
        ClassificationPolicy {
            fail_on_warnings: false,
            fail_on_information: false,
        }
    }

    #[test]
    fn no_findings_passes() {
        let c = classify(&[], &ClassificationPolicy::default());
        assert!(c.passed);
        assert!(c.suites.is_empty());
    }

    #[test]
    fn errors_and_fatals_always_fail() {
        for severity in [Severity::Fatal, Severity::Error] {
            let c = classify(&[finding("X", severity, "m")], &lenient());
            assert!(!c.passed, "{severity} must fail");
        }
    }

    #[test]
    fn warnings_follow_policy() {
        let findings = [finding("PrivateResource", Severity::Warning, "m")];

        assert!(classify(&findings, &lenient()).passed);
        assert!(
            !classify(
                &findings,
                &ClassificationPolicy {
                    fail_on_warnings: true,
                    fail_on_information: false
                }
            )
            .passed
        );
    }

    #[test]
    fn information_follows_policy() {
        let findings = [finding("Info", Severity::Information, "m")];

        assert!(classify(&findings, &lenient()).passed);
        assert!(!classify(&findings, &ClassificationPolicy::default()).passed);
    }

    #[test]
    fn baseline_filtered_with_expected_message_passes() {
        let findings = [finding(
            BASELINE_FILTERED_ID,
            Severity::Information,
            "1 error and 7 warnings were filtered out because they are listed in the baseline file",
        )];
        assert!(classify(&findings, &ClassificationPolicy::default()).passed);
    }

    #[test]
    fn baseline_filtered_with_divergent_message_fails() {
        let findings = [finding(
            BASELINE_FILTERED_ID,
            Severity::Information,
            "baseline file could not be read",
        )];
        let c = classify(&findings, &lenient());
        assert!(!c.passed);
        assert_eq!(c.suites[0].id, BASELINE_FILTERED_ID);
    }

    #[test]
    fn baseline_fixed_is_exempt_regardless_of_policy() {
        let findings = [finding(
            BASELINE_FIXED_ID,
            Severity::Information,
            "3 errors/warnings were listed in the baseline file but not found in the project; perhaps they have been fixed?",
        )];
        assert!(classify(&findings, &ClassificationPolicy::default()).passed);
    }

    #[test]
    fn exemptions_are_configurable() {
        let exemptions = BaselineExemptions {
            analyzer_version: "9.0".into(),
            entries: vec![ExemptIssue {
                id: "LintError".into(),
                expected_message: "filtered out because".into(),
            }],
        };
        let findings = [
            finding("LintError", Severity::Information, "7 warnings were filtered out because"),
            finding(BASELINE_FILTERED_ID, Severity::Information, "filtered out because"),
        ];

        let c = classify_with(&findings, &ClassificationPolicy::default(), &exemptions);

        assert!(!c.passed);
        assert_eq!(c.suites.len(), 1);
        assert_eq!(c.suites[0].id, BASELINE_FILTERED_ID);
        assert!(classify_with(&findings, &lenient(), &exemptions).passed);
    }

    #[test]
    fn failing_findings_are_grouped_by_id_in_first_seen_order() {
        let findings = [
            finding("LongLogTag", Severity::Error, "a"),
            finding("Typos", Severity::Warning, "b"),
            finding("LongLogTag", Severity::Error, "c"),
            finding("Quiet", Severity::Information, "d"),
        ];
        let policy = ClassificationPolicy {
            fail_on_warnings: true,
            fail_on_information: false,
        };

        let c = classify(&findings, &policy);

        let ids: Vec<&str> = c.suites.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["LongLogTag", "Typos"]);
        assert_eq!(c.suites[0].findings.len(), 2);
        assert_eq!(c.suites[0].findings[1].message, "c");
        assert_eq!(c.failure_count(), 3);
    }

    #[test]
    fn classification_is_deterministic_for_same_input() {
        let findings = [
            finding("B", Severity::Error, "1"),
            finding("A", Severity::Error, "2"),
        ];
        let a = classify(&findings, &ClassificationPolicy::default());
        let b = classify(&findings, &ClassificationPolicy::default());
        assert_eq!(a, b);
    }
}
