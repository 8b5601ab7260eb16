use std::env;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lintbridge_core::env::ProcessEnv;
use lintbridge_core::model::dependency::{AarDescriptor, decode_all};
use lintbridge_core::model::module::{ModuleSpec, SdkVersions};
use lintbridge_core::model::project::{ProjectModelBuilder, ProjectSpec};
use lintbridge_core::report::render;
use lintbridge_core::rules::policy::ClassificationPolicy;
use lintbridge_core::sanitize::Sanitizer;
use lintbridge_core::{ResultsRequest, baseline, partial, process_results};

mod args;

use args::{Args, Command, OutputFormat, ProjectArgs, PruneArgs, ReportArgs, SanitizeArgs};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    debug!(?args, "lintbridge starting");

    let exit_code = match &args.command {
        Command::Project(project) => run_project(project, args.verbose)?,
        Command::Sanitize(sanitize) => run_sanitize(sanitize)?,
        Command::Report(report) => run_report(report)?,
        Command::Prune(prune) => run_prune(prune)?,
    };

    std::process::exit(exit_code);
}

fn run_project(args: &ProjectArgs, verbose: bool) -> Result<i32> {
    let mut primary = ModuleSpec::new(&args.name, &args.partial_results_dir, &args.models_dir);
    primary.is_platform_target = args.android;
    primary.is_library = args.library;
    primary.sdk = SdkVersions {
        min: args.min_sdk_version.clone(),
        target: args.target_sdk_version.clone(),
        compile: args.compile_sdk_version.clone(),
    };
    primary.sources = args.sources.clone();
    primary.resources = args.resource_files.clone();
    primary.manifest = args.manifest.clone();
    primary.merged_manifest = args.merged_manifest.clone();
    primary.package_name = args.package_name.clone();
    primary.resource_configurations = args.res_configs.clone();
    primary.java_source_level = args.java_source_level.clone();

    let mut spec = ProjectSpec::new(primary);
    spec.dependencies = decode_all(args.dependencies.iter().map(String::as_str))
        .context("invalid --dependencies entry")?;
    spec.aars = args
        .aar_dirs
        .iter()
        .map(|encoded| AarDescriptor::decode(encoded))
        .collect::<lintbridge_core::Result<_>>()
        .context("invalid --aar-dirs entry")?;
    spec.classpath = args.classpath.clone();
    spec.lint_checks = args.lint_checks.clone();
    spec.reuse_models = args.no_create_models_dir;
    spec.verbose = verbose;

    let project = ProjectModelBuilder::new(&ProcessEnv)
        .build(&spec)
        .with_context(|| format!("generating lint models for {}", args.name))?;
    let written = project.write(&args.project_xml)?;
    info!(path = %written.display(), modules = project.dependencies.len() + 1, "wrote project descriptor");

    if let Some(original) = &args.baseline {
        let dir = args.project_xml.parent().unwrap_or(Path::new("."));
        let working = baseline::prepare_baseline(dir, Some(original))?;
        info!(path = %working.display(), "prepared baseline");
    }
    Ok(0)
}

fn run_sanitize(args: &SanitizeArgs) -> Result<i32> {
    let output = args.output.as_deref().unwrap_or(&args.input);
    Sanitizer::from_env(&ProcessEnv)
        .sanitize_file(&args.input, output)
        .with_context(|| format!("sanitizing {}", args.input.display()))?;
    Ok(0)
}

fn run_report(args: &ReportArgs) -> Result<i32> {
    let mut request = ResultsRequest::new(
        &args.name,
        &args.results_xml,
        &args.output_junit_xml,
        &args.result_code,
    );
    request.policy = ClassificationPolicy {
        fail_on_warnings: args.fail_on_warning,
        fail_on_information: args.fail_on_information,
    };
    request.elapsed = Duration::from_millis(args.elapsed_ms);

    let verdict = process_results(&request).context("writing lint results")?;

    if let (Some(new_baseline), Some(updated)) = (&args.baseline, &args.updated_baseline) {
        baseline::post_process(new_baseline, updated, &Sanitizer::from_env(&ProcessEnv))
            .context("writing updated baseline")?;
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&verdict)? + "\n",
        OutputFormat::Text => render::render_text(&verdict),
    };
    print!("{output}");

    Ok(if args.exitcode && !verdict.passed() { 1 } else { 0 })
}

fn run_prune(args: &PruneArgs) -> Result<i32> {
    let dir = &args.partial_results_dir;
    if args.reset {
        partial::reset(dir)?;
        info!(dir = %dir.display(), "reset partial results");
        return Ok(0);
    }

    let removed = partial::prune(dir)?;
    for file in partial::list_files(dir)? {
        debug!(file = %file.display(), "kept partial result");
    }
    info!(dir = %dir.display(), removed, "pruned partial results");
    Ok(0)
}

fn init_logging(args: &Args) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level) = &args.log_level {
            parse_level(level)
        } else if args.verbose {
            Level::DEBUG
        } else if args.quiet {
            Level::ERROR
        } else {
            let level = env::var("LINTBRIDGE_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
            parse_level(&level)
        };

        let mut filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            for crate_name in ["lintbridge_core", "lintbridge_cli"] {
                if let Ok(directive) = format!("{crate_name}={level}").parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{level}', defaulting to WARN. Valid levels: trace, debug, info, warn, error"
            );
            Level::WARN
        }
    }
}
