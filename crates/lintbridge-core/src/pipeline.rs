//! Interpretation of one analyzer run into the build's output artifacts.
//!
//! The JUnit report and the status file are always attempted, even when the
//! analyzer output cannot be read, so downstream test runners have something
//! to consume. Only failing to write those outputs is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::findings::parse::parse_findings;
use crate::report::model::JunitReport;
use crate::report::render::render_junit;
use crate::rules::classify::{ClassifiedResult, classify_with};
use crate::rules::policy::{BaselineExemptions, ClassificationPolicy};
use crate::{STATUS_FAILED, STATUS_PASSED};

#[derive(Debug, Clone)]
pub struct ResultsRequest {
    /// Target label, used as the report name.
    pub name: String,
    pub results_file: PathBuf,
    pub report_file: PathBuf,
    pub status_file: PathBuf,
    pub policy: ClassificationPolicy,
    pub exemptions: BaselineExemptions,
    pub elapsed: Duration,
}

impl ResultsRequest {
    pub fn new(
        name: impl Into<String>,
        results_file: impl Into<PathBuf>,
        report_file: impl Into<PathBuf>,
        status_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            results_file: results_file.into(),
            report_file: report_file.into(),
            status_file: status_file.into(),
            policy: ClassificationPolicy::default(),
            exemptions: BaselineExemptions::default(),
            elapsed: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Passed,
    Failed,
}

impl Status {
    /// Contents of the status artifact.
    pub fn artifact(self) -> &'static str {
        match self {
            Status::Passed => STATUS_PASSED,
            Status::Failed => STATUS_FAILED,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", s.trim_matches('"'))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SuiteSummary {
    pub id: String,
    pub count: usize,
}

/// Outcome of [`process_results`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Verdict {
    pub name: String,
    pub status: Status,
    /// Total findings reported by the analyzer.
    pub findings: usize,
    pub failures: usize,
    pub suites: Vec<SuiteSummary>,
    /// Set when the analyzer output could not be interpreted.
    pub error: Option<String>,
}

impl Verdict {
    fn classified(name: &str, findings: usize, result: &ClassifiedResult) -> Self {
        Self {
            name: name.to_string(),
            status: if result.passed {
                Status::Passed
            } else {
                Status::Failed
            },
            findings,
            failures: result.failure_count(),
            suites: result
                .suites
                .iter()
                .map(|s| SuiteSummary {
                    id: s.id.clone(),
                    count: s.findings.len(),
                })
                .collect(),
            error: None,
        }
    }

    fn unreadable(name: &str, error: &Error) -> Self {
        Self {
            name: name.to_string(),
            status: Status::Failed,
            findings: 0,
            failures: 0,
            suites: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }
}

pub fn process_results(request: &ResultsRequest) -> Result<Verdict> {
    let verdict = match interpret(request) {
        Ok((total, result)) => {
            let report = JunitReport::from_result(&request.name, &result, request.elapsed);
            let written = write_output(&request.report_file, render_junit(&report).as_bytes());
            if let Err(e) = written {
                write_status(&request.status_file, Status::Failed)?;
                return Err(e);
            }
            Verdict::classified(&request.name, total, &result)
        }
        Err(e) => {
            warn!(
                error = %e,
                results = %request.results_file.display(),
                "analyzer output unusable, failing the run"
            );
            let raw = fs::read(&request.results_file).unwrap_or_default();
            if let Err(write_err) = write_output(&request.report_file, &raw) {
                write_status(&request.status_file, Status::Failed)?;
                return Err(write_err);
            }
            Verdict::unreadable(&request.name, &e)
        }
    };

    write_status(&request.status_file, verdict.status)?;

    info!(
        target_name = %verdict.name,
        status = %verdict.status,
        findings = verdict.findings,
        failures = verdict.failures,
        "analysis verdict"
    );
    Ok(verdict)
}

fn interpret(request: &ResultsRequest) -> Result<(usize, ClassifiedResult)> {
    let xml = fs::read_to_string(&request.results_file)
        .map_err(|e| Error::io("read results", &request.results_file, e))?;
    let findings = parse_findings(&xml)?;
    debug!(count = findings.len(), "parsed findings");
    let result = classify_with(&findings, &request.policy, &request.exemptions);
    Ok((findings.len(), result))
}

fn write_status(path: &Path, status: Status) -> Result<()> {
    write_output(path, status.artifact().as_bytes())
}

fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io("write", path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}
