pub mod classify;
pub mod policy;

pub use classify::{ClassifiedResult, IssueSuite, classify, classify_with};
pub use policy::{BaselineExemptions, ClassificationPolicy, ExemptIssue};
