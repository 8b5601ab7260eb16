pub mod model;
pub mod parse;

pub use model::{Finding, Location, Severity};
pub use parse::parse_findings;
