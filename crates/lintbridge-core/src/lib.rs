pub mod baseline;
pub mod env;
pub mod error;
pub mod findings;
pub mod model;
pub mod partial;
pub mod report;
pub mod rules;
pub mod sanitize;
pub mod util;

mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{ResultsRequest, Status, SuiteSummary, Verdict, process_results};

pub const TOOL_NAME: &str = "lintbridge";

/// Contents of the status artifact for a passing run.
pub const STATUS_PASSED: &str = "0";

/// Contents of the status artifact for a failing run.
pub const STATUS_FAILED: &str = "1";
