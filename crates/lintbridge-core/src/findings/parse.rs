//! Reader for the analyzer's XML findings report.
//!
//! ```xml
//! <issues format="6" by="lint 8.0.2">
//!     <issue id=".." severity=".." message=".." summary=".." explanation=".."
//!            errorLine1=".." errorLine2="..">
//!         <location file=".." line=".." column=".."/>
//!     </issue>
//! </issues>
//! ```

use roxmltree::{Document, Node};
use tracing::warn;

use crate::findings::model::{Finding, Location, Severity};
use crate::{Error, Result};

/// Parse every `<issue>` in document order.
pub fn parse_findings(xml: &str) -> Result<Vec<Finding>> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "issues" {
        return Err(Error::Parse(format!(
            "expected <issues> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    root.children()
        .filter(|n| n.has_tag_name("issue"))
        .map(parse_issue)
        .collect()
}

fn parse_issue(issue: Node<'_, '_>) -> Result<Finding> {
    let id = issue
        .attribute("id")
        .ok_or_else(|| Error::Parse(format!("issue at byte {} has no id", issue.range().start)))?;

    let severity_text = issue.attribute("severity").unwrap_or_default();
    let severity = Severity::parse(severity_text).unwrap_or_else(|| {
        warn!(id, severity = severity_text, "unrecognized severity, treating as Error");
        Severity::Error
    });

    let location = issue
        .children()
        .find(|n| n.has_tag_name("location"))
        .map(|loc| Location {
            file: loc.attribute("file").unwrap_or_default().to_string(),
            line: loc.attribute("line").and_then(|v| v.parse().ok()),
            column: loc.attribute("column").and_then(|v| v.parse().ok()),
        })
        .unwrap_or_default();

    let error_lines = ["errorLine1", "errorLine2"]
        .iter()
        .filter_map(|name| issue.attribute(*name))
        .map(str::to_string)
        .collect();

    let text = |name: &str| issue.attribute(name).unwrap_or_default().to_string();

    Ok(Finding {
        id: id.to_string(),
        severity,
        message: text("message"),
        summary: text("summary"),
        explanation: text("explanation"),
        location,
        error_lines,
    })
}
