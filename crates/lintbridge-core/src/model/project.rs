//! The multi-module `project.xml` handed to the analyzer.
//!
//! Element order inside the primary module is fixed (sources, resources,
//! lint-check jars, aars, manifest, merged manifest, classpath, deps) so the
//! document is byte-stable for identical inputs and can be cached.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::env::Env;
use crate::model::dependency::{AarDescriptor, DependencyDescriptor};
use crate::model::module::{ModuleDescriptor, ModuleModelBuilder, ModuleSpec};
use crate::util::deterministic::unique_in_order;
use crate::util::xml::{Element, XmlWriter};
use crate::{Error, Result};

const RES_DIR: &str = "res";

/// Everything needed to describe one analyzer invocation.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    pub primary: ModuleSpec,
    pub dependencies: Vec<DependencyDescriptor>,
    pub classpath: Vec<String>,
    pub aars: Vec<AarDescriptor>,
    pub lint_checks: Vec<String>,
    /// Keep an existing models directory instead of regenerating it.
    pub reuse_models: bool,
    pub verbose: bool,
}

impl ProjectSpec {
    pub fn new(primary: ModuleSpec) -> Self {
        Self {
            primary,
            dependencies: Vec::new(),
            classpath: Vec::new(),
            aars: Vec::new(),
            lint_checks: Vec::new(),
            reuse_models: false,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    pub primary: ModuleDescriptor,
    pub dependencies: Vec<ModuleDescriptor>,
    pub classpath_entries: Vec<String>,
    pub aars: Vec<AarDescriptor>,
    pub lint_checks: Vec<String>,
}

impl ProjectDescriptor {
    /// Render the project document.
    pub fn render(&self) -> String {
        let primary = &self.primary;
        let mut w = XmlWriter::with_declaration();
        w.open(Element::new("project"));

        w.open(module_element(primary));
        for src in &primary.sources {
            w.empty(Element::new("src").attr("file", src).attr("test", false));
        }
        for resource in res_roots(&primary.resources) {
            w.empty(Element::new("resource").attr("file", resource));
        }
        for jar in &self.lint_checks {
            w.empty(Element::new("lint-checks").attr("jar", jar));
        }
        for aar in &self.aars {
            w.empty(
                Element::new("aar")
                    .attr("file", aar.file.display())
                    .attr("extracted", aar.extracted.display()),
            );
        }
        if let Some(manifest) = &primary.manifest {
            w.empty(Element::new("manifest").attr("file", manifest.display()));
        }
        if let Some(merged) = &primary.merged_manifest {
            w.empty(Element::new("merged-manifest").attr("file", merged.display()));
        }
        for jar in &self.classpath_entries {
            w.empty(Element::new("classpath").attr("jar", jar));
        }
        for dep in &self.dependencies {
            w.empty(Element::new("dep").attr("module", &dep.name));
        }
        w.close("module");

        for dep in &self.dependencies {
            w.empty(module_element(dep));
        }

        w.close("project");
        w.finish()
    }

    /// Render and write the document to `path`.
    pub fn write(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io("create project directory", parent, e))?;
        }
        fs::write(path, self.render()).map_err(|e| Error::io("write", path, e))?;
        Ok(path.to_path_buf())
    }
}

fn module_element(module: &ModuleDescriptor) -> Element<'_> {
    Element::new("module")
        .attr("name", &module.name)
        .attr("android", module.is_platform_target)
        .attr("library", module.is_library)
        .attr("partial-results-dir", module.results_dir.display())
        .attr_opt("model", module.models_dir.as_ref().map(|m| m.display()))
        .attr("compile-sdk-version", &module.compile_sdk_version)
        .attr("desugar", "full")
}

pub struct ProjectModelBuilder<'e> {
    env: &'e dyn Env,
}

impl<'e> ProjectModelBuilder<'e> {
    pub fn new(env: &'e dyn Env) -> Self {
        Self { env }
    }

    /// Write the primary module's models and assemble the project.
    pub fn build(&self, spec: &ProjectSpec) -> Result<ProjectDescriptor> {
        let mut seen = HashSet::new();
        for dep in &spec.dependencies {
            if !seen.insert(dep.name.as_str()) {
                return Err(Error::DuplicateDependency(dep.name.clone()));
            }
        }

        let primary =
            ModuleModelBuilder::new(self.env).build_or_reuse(&spec.primary, spec.reuse_models)?;

        let dependencies = spec
            .dependencies
            .iter()
            .map(|dep| ModuleDescriptor::from_dependency(dep, &primary.compile_sdk_version))
            .collect();

        let project = ProjectDescriptor {
            primary,
            dependencies,
            classpath_entries: spec.classpath.clone(),
            aars: spec.aars.clone(),
            lint_checks: spec.lint_checks.clone(),
        };

        if spec.verbose {
            debug!(document = %project.render(), "generated project descriptor");
        }
        Ok(project)
    }
}

/// Reduce resource files to their `res` roots.
///
/// Files are grouped by everything before the last `res/` segment, and each
/// group becomes `<prefix>res`. Some checks (missing translations, for one)
/// only run when given a whole resource directory. Paths without a `res/`
/// segment pass through unchanged.
pub fn res_roots(resources: &[String]) -> Vec<String> {
    unique_in_order(resources.iter().map(|resource| {
        match last_res_segment(resource) {
            Some(start) => format!("{}{RES_DIR}", &resource[..start]),
            None => resource.clone(),
        }
    }))
}

/// Byte offset of the last `res/` that starts a path segment.
fn last_res_segment(path: &str) -> Option<usize> {
    let needle = "res/";
    path.match_indices(needle)
        .map(|(index, _)| index)
        .filter(|&index| index == 0 || path.as_bytes()[index - 1] == b'/')
        .last()
}
