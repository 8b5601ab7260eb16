//! Per-module lint model files.
//!
//! The analyzer reads each module from a models directory containing:
//!
//! - `module.xml`: module identity, type and build folder
//! - `main.xml`: the single `main` variant with SDK levels and source sets
//! - `main-artifact-libraries.xml` / `main-artifact-dependencies.xml`:
//!   required by the schema even though they are always empty here
//!
//! Source and resource directories are not passed in directly. They are
//! inferred from file lists with [`common_ancestor`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::env::Env;
use crate::model::dependency::DependencyDescriptor;
use crate::util::deterministic::unique_in_order;
use crate::util::paths::{absolutize, normalize, relative_path};
use crate::util::xml::{Element, XmlWriter};
use crate::{Error, Result};

pub const MODULE_FILE: &str = "module.xml";
pub const VARIANT_FILE: &str = "main.xml";
pub const LIBRARIES_FILE: &str = "main-artifact-libraries.xml";
pub const DEPENDENCIES_FILE: &str = "main-artifact-dependencies.xml";

pub const VARIANT_NAME: &str = "main";
pub const DEFAULT_JAVA_SOURCE_LEVEL: &str = "1.8";

/// Maven coordinate written for modules that are not published artifacts.
pub const NON_MAVEN: &str = "::";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkVersions {
    pub min: String,
    pub target: String,
    pub compile: String,
}

impl Default for SdkVersions {
    fn default() -> Self {
        Self {
            min: "1".into(),
            target: "34".into(),
            compile: "34".into(),
        }
    }
}

/// Build-graph facts about one module, as handed over by the build action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    pub is_platform_target: bool,
    pub is_library: bool,
    pub sdk: SdkVersions,
    pub sources: Vec<String>,
    pub resources: Vec<String>,
    pub manifest: Option<PathBuf>,
    pub merged_manifest: Option<PathBuf>,
    pub package_name: Option<String>,
    pub results_dir: PathBuf,
    pub models_dir: PathBuf,
    pub resource_configurations: Vec<String>,
    pub java_source_level: String,
}

impl ModuleSpec {
    pub fn new(name: impl Into<String>, results_dir: impl Into<PathBuf>, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            is_platform_target: true,
            is_library: false,
            sdk: SdkVersions::default(),
            sources: Vec::new(),
            resources: Vec::new(),
            manifest: None,
            merged_manifest: None,
            package_name: None,
            results_dir: results_dir.into(),
            models_dir: models_dir.into(),
            resource_configurations: Vec::new(),
            java_source_level: DEFAULT_JAVA_SOURCE_LEVEL.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleType {
    App,
    Library,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::App => "APP",
            ModuleType::Library => "LIBRARY",
        }
    }
}

/// One module of the analyzed project, primary or dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub is_platform_target: bool,
    pub is_library: bool,
    /// Present only for platform modules that are not libraries.
    pub sdk_versions: Option<SdkVersions>,
    pub compile_sdk_version: String,
    pub sources: Vec<String>,
    pub resources: Vec<String>,
    pub manifest: Option<PathBuf>,
    pub merged_manifest: Option<PathBuf>,
    pub package_name: Option<String>,
    pub results_dir: PathBuf,
    /// Dependencies built without lint models leave this empty.
    pub models_dir: Option<PathBuf>,
    pub resource_configurations: Vec<String>,
}

impl ModuleDescriptor {
    pub fn from_spec(spec: &ModuleSpec) -> Self {
        let sdk_versions =
            (spec.is_platform_target && !spec.is_library).then(|| spec.sdk.clone());

        Self {
            name: spec.name.clone(),
            is_platform_target: spec.is_platform_target,
            is_library: spec.is_library,
            sdk_versions,
            compile_sdk_version: spec.sdk.compile.clone(),
            sources: spec.sources.clone(),
            resources: spec.resources.clone(),
            manifest: spec.manifest.clone(),
            merged_manifest: spec.merged_manifest.clone(),
            package_name: spec.package_name.clone(),
            results_dir: spec.results_dir.clone(),
            models_dir: Some(spec.models_dir.clone()),
            resource_configurations: unique_in_order(spec.resource_configurations.iter().cloned()),
        }
    }

    /// A dependency module only carries what its own build produced.
    pub fn from_dependency(dep: &DependencyDescriptor, compile_sdk_version: &str) -> Self {
        Self {
            name: dep.name.clone(),
            is_platform_target: dep.is_platform_target,
            is_library: dep.is_library,
            sdk_versions: None,
            compile_sdk_version: compile_sdk_version.to_string(),
            sources: Vec::new(),
            resources: Vec::new(),
            manifest: None,
            merged_manifest: None,
            package_name: None,
            results_dir: dep.results_dir.clone(),
            models_dir: dep.models_dir.clone(),
            resource_configurations: Vec::new(),
        }
    }

    pub fn module_type(&self) -> ModuleType {
        if self.is_library {
            ModuleType::Library
        } else {
            ModuleType::App
        }
    }
}

/// Writes the model files of one module.
pub struct ModuleModelBuilder<'e> {
    env: &'e dyn Env,
}

impl<'e> ModuleModelBuilder<'e> {
    pub fn new(env: &'e dyn Env) -> Self {
        Self { env }
    }

    /// Write all model files for `spec` into its models directory.
    pub fn build(&self, spec: &ModuleSpec) -> Result<ModuleDescriptor> {
        let descriptor = ModuleDescriptor::from_spec(spec);
        let models_dir = &spec.models_dir;
        let build_dir = models_dir.join("build");
        let classes_dir = build_dir.join("classes");

        fs::create_dir_all(&classes_dir)
            .map_err(|e| Error::io("create models directory", &classes_dir, e))?;

        let working_dir = normalize(&self.env.working_directory());
        let project_dir = relative_path(&absolutize(models_dir, &working_dir), &working_dir);

        write(
            &models_dir.join(MODULE_FILE),
            &render_module(&descriptor, &project_dir, &build_dir, &spec.java_source_level),
        )?;
        write(
            &models_dir.join(VARIANT_FILE),
            &render_variant(&descriptor, &classes_dir),
        )?;
        write(&models_dir.join(LIBRARIES_FILE), "<libraries>\n</libraries>\n")?;
        write(
            &models_dir.join(DEPENDENCIES_FILE),
            "<dependencies>\n</dependencies>\n",
        )?;

        debug!(module = %spec.name, models_dir = %models_dir.display(), "wrote lint models");
        Ok(descriptor)
    }

    /// Like [`ModuleModelBuilder::build`], but keeps an existing models
    /// directory untouched when `reuse` is set. The report action relies on
    /// this to read the models produced by the analyze action.
    pub fn build_or_reuse(&self, spec: &ModuleSpec, reuse: bool) -> Result<ModuleDescriptor> {
        if reuse && spec.models_dir.exists() {
            debug!(module = %spec.name, "reusing existing lint models");
            return Ok(ModuleDescriptor::from_spec(spec));
        }
        self.build(spec)
    }
}

/// Render `module.xml`.
pub fn render_module(
    module: &ModuleDescriptor,
    project_dir: &Path,
    build_dir: &Path,
    java_source_level: &str,
) -> String {
    let mut w = XmlWriter::new();
    w.open(
        Element::new("lint-module")
            .attr("dir", project_dir.display())
            .attr("name", &module.name)
            .attr("type", module.module_type().as_str())
            .attr("maven", NON_MAVEN)
            .attr("buildFolder", build_dir.display())
            .attr("javaSourceLevel", java_source_level)
            .attr("compileTarget", &module.compile_sdk_version)
            .attr("neverShrinking", true),
    );
    w.empty(Element::new("lintOptions"));
    w.empty(Element::new("variant").attr("name", VARIANT_NAME));
    w.close("lint-module");
    w.finish()
}

/// Render `main.xml`, the module's only variant.
pub fn render_variant(module: &ModuleDescriptor, classes_dir: &Path) -> String {
    let sdk = module.sdk_versions.as_ref();
    let resource_configurations =
        (!module.resource_configurations.is_empty()).then(|| module.resource_configurations.join(","));

    let mut w = XmlWriter::new();
    w.open(
        Element::new("variant")
            .attr("name", VARIANT_NAME)
            .attr_opt("minSdkVersion", sdk.map(|s| &s.min))
            .attr_opt("targetSdkVersion", sdk.map(|s| &s.target))
            .attr("debuggable", true)
            .attr("useSupportLibraryVectorDrawables", true)
            .attr_opt("package", module.package_name.as_ref())
            .attr("partialResultsDir", module.results_dir.display())
            .attr_opt("resourceConfigurations", resource_configurations)
            .attr_opt(
                "mergedManifest",
                module.merged_manifest.as_ref().map(|m| m.display()),
            ),
    );
    w.empty(Element::new("buildFeatures"));
    w.open(Element::new("sourceProviders"));
    w.empty(source_provider(module));
    w.close("sourceProviders");
    w.open(
        Element::new("artifact")
            .attr("type", "MAIN")
            .attr("classOutputs", classes_dir.display())
            .attr_opt("applicationId", module.package_name.as_ref()),
    );
    w.close("artifact");
    w.close("variant");
    w.finish()
}

fn source_provider(module: &ModuleDescriptor) -> Element<'static> {
    let non_empty = |dir: Option<String>| dir.filter(|d| !d.is_empty());

    Element::new("sourceProvider")
        .attr_opt("manifest", module.manifest.as_ref().map(|m| m.display()))
        .attr_opt(
            "javaDirectories",
            non_empty(common_ancestor(&module.sources, false)),
        )
        .attr_opt(
            "resDirectories",
            non_empty(common_ancestor(&module.resources, true)),
        )
}

/// Directory shared by every path in `paths`, with a trailing `/`.
///
/// - no paths: `None`
/// - one path: its parent, or its grandparent for resources since a single
///   `res/values/strings.xml` should land on the resource root
/// - several paths: the longest run of leading `/`-separated segments that
///   is identical across all paths
pub fn common_ancestor(paths: &[String], is_resources: bool) -> Option<String> {
    match paths {
        [] => None,
        [single] => {
            let parent = Path::new(single).parent()?;
            let dir = if is_resources { parent.parent()? } else { parent };
            Some(with_trailing_separator(&dir.display().to_string()))
        }
        [first, rest @ ..] => {
            let rest: Vec<Vec<&str>> = rest.iter().map(|p| p.split('/').collect()).collect();
            let mut prefix = String::new();
            for (index, segment) in first.split('/').enumerate() {
                if rest.iter().any(|other| other.get(index) != Some(&segment)) {
                    break;
                }
                prefix.push_str(segment);
                prefix.push('/');
            }
            Some(prefix)
        }
    }
}

fn with_trailing_separator(dir: &str) -> String {
    if dir.is_empty() || dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io("write", path, e))
}
