use std::time::Duration;

use serde::Serialize;

use crate::findings::model::Finding;
use crate::rules::classify::ClassifiedResult;

/// JUnit-style report of one analyzer run.
///
/// One suite per failing issue id, one case per failing finding. A passing
/// run still produces a single synthetic passing case so CI dashboards
/// register that the analysis ran.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JunitReport {
    pub name: String,
    pub tests: usize,
    /// Whole seconds.
    pub time: u64,
    pub suites: Vec<TestSuite>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TestSuite {
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub time: u64,
    pub cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub classname: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub failure: Option<Failure>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
}

impl JunitReport {
    pub fn from_result(name: &str, result: &ClassifiedResult, elapsed: Duration) -> Self {
        let time = elapsed.as_secs();

        let suites: Vec<TestSuite> = if result.suites.is_empty() {
            vec![TestSuite {
                name: name.to_string(),
                tests: 1,
                failures: 0,
                time,
                cases: vec![TestCase {
                    name: format!("Android lint on {name}"),
                    classname: name.to_string(),
                    file: None,
                    line: None,
                    failure: None,
                }],
            }]
        } else {
            result
                .suites
                .iter()
                .map(|suite| TestSuite {
                    name: suite.id.clone(),
                    tests: suite.findings.len(),
                    failures: suite.findings.len(),
                    time,
                    cases: suite.findings.iter().map(failing_case).collect(),
                })
                .collect()
        };

        Self {
            name: name.to_string(),
            tests: suites.iter().map(|s| s.tests).sum(),
            time,
            suites,
        }
    }

    pub fn failures(&self) -> usize {
        self.suites.iter().map(|s| s.failures).sum()
    }
}

fn failing_case(finding: &Finding) -> TestCase {
    let file = finding.location.file.replace("../", "");
    TestCase {
        name: finding.message.clone(),
        classname: finding.summary.clone(),
        failure: Some(Failure {
            message: failure_message(finding, &file),
        }),
        file: Some(file),
        line: finding.location.line,
    }
}

/// Explanation, a blank line, the location, then the echoed source lines.
fn failure_message(finding: &Finding, file: &str) -> String {
    let location = match finding.location.line {
        Some(line) => format!("File: {file}:{line}"),
        None => format!("File: {file}"),
    };

    let mut lines = vec![
        finding.explanation.clone(),
        String::new(),
        location,
        "Error line:".to_string(),
    ];
    lines.extend(finding.error_lines.iter().cloned());
    lines.join("\n")
}
