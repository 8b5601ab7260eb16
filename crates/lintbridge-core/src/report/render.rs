use crate::TOOL_NAME;
use crate::pipeline::Verdict;
use crate::report::model::JunitReport;
use crate::util::xml::{Element, XmlWriter};

pub fn render_junit(report: &JunitReport) -> String {
    let mut w = XmlWriter::with_declaration();
    w.open(
        Element::new("testsuites")
            .attr("name", &report.name)
            .attr("tests", report.tests)
            .attr("time", report.time),
    );

    for suite in &report.suites {
        w.open(
            Element::new("testsuite")
                .attr("name", &suite.name)
                .attr("tests", suite.tests)
                .attr("failures", suite.failures)
                .attr("time", suite.time),
        );
        for case in &suite.cases {
            let element = Element::new("testcase")
                .attr("name", &case.name)
                .attr("classname", &case.classname)
                .attr_opt("file", case.file.as_deref())
                .attr_opt("line", case.line);
            match &case.failure {
                Some(failure) => {
                    w.open(element);
                    w.empty(Element::new("failure").attr("message", &failure.message));
                    w.close("testcase");
                }
                None => w.empty(element),
            }
        }
        w.close("testsuite");
    }

    w.close("testsuites");
    w.finish()
}

pub fn render_text(verdict: &Verdict) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", TOOL_NAME, verdict.name));
    out.push_str(&format!("Status: {}\n", verdict.status));
    out.push_str(&format!(
        "Findings: {} ({} failing)\n",
        verdict.findings, verdict.failures
    ));
    if let Some(error) = &verdict.error {
        out.push_str(&format!("Error: {error}\n"));
    }
    if !verdict.suites.is_empty() {
        out.push_str("Failing issues:\n");
        for s in &verdict.suites {
            out.push_str(&format!("  - {} ({})\n", s.id, s.count));
        }
    }
    out
}
