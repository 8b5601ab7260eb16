pub mod deterministic;
pub mod paths;
pub mod xml;
