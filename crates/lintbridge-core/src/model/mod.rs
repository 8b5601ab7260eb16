//! Translation of build-graph metadata into the analyzer's project model.

pub mod dependency;
pub mod module;
pub mod project;

pub use dependency::{AarDescriptor, DependencyDescriptor};
pub use module::{ModuleDescriptor, ModuleModelBuilder, ModuleSpec, SdkVersions};
pub use project::{ProjectDescriptor, ProjectModelBuilder, ProjectSpec};
