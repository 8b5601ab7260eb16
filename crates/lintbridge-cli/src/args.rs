use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "lintbridge",
    version,
    about = "Bridges build-graph metadata and Android Lint project models and results"
)]
pub struct Args {
    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write lint models and the project descriptor for one target
    Project(ProjectArgs),
    /// Remove sandbox-specific paths from analyzer output
    Sanitize(SanitizeArgs),
    /// Interpret analyzer results into a JUnit report and status file
    Report(ReportArgs),
    /// Drop per-run result files from a partial results directory
    Prune(PruneArgs),
}

#[derive(Debug, ClapArgs)]
pub struct ProjectArgs {
    /// Target label
    #[arg(long)]
    pub name: String,

    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub android: bool,

    #[arg(long)]
    pub library: bool,

    #[arg(long)]
    pub package_name: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub sources: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub resource_files: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub classpath: Vec<String>,

    #[arg(long)]
    pub manifest: Option<PathBuf>,

    #[arg(long)]
    pub merged_manifest: Option<PathBuf>,

    /// Encoded as `name^android^library^partial_results_dir[^models_dir]`
    #[arg(long, value_delimiter = ',')]
    pub dependencies: Vec<String>,

    /// Encoded as `aar_file^extracted_dir`
    #[arg(long, value_delimiter = ',')]
    pub aar_dirs: Vec<String>,

    /// Custom rule jars
    #[arg(long, value_delimiter = ',')]
    pub lint_checks: Vec<String>,

    #[arg(long)]
    pub partial_results_dir: PathBuf,

    #[arg(long)]
    pub models_dir: PathBuf,

    /// Reuse an existing models directory
    #[arg(long)]
    pub no_create_models_dir: bool,

    /// Where to write the project descriptor
    #[arg(long)]
    pub project_xml: PathBuf,

    /// Baseline to copy next to the project descriptor
    #[arg(long)]
    pub baseline: Option<PathBuf>,

    #[arg(long, default_value = "34")]
    pub compile_sdk_version: String,

    #[arg(long, default_value = "1")]
    pub min_sdk_version: String,

    #[arg(long, default_value = "34")]
    pub target_sdk_version: String,

    #[arg(long, value_delimiter = ',')]
    pub res_configs: Vec<String>,

    #[arg(long, default_value = "1.8")]
    pub java_source_level: String,
}

#[derive(Debug, ClapArgs)]
pub struct SanitizeArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// Defaults to rewriting the input in place
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, ClapArgs)]
pub struct ReportArgs {
    /// Target label
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub results_xml: PathBuf,

    #[arg(long)]
    pub output_junit_xml: PathBuf,

    /// Status file, receives `0` or `1`
    #[arg(long)]
    pub result_code: PathBuf,

    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub fail_on_warning: bool,

    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub fail_on_information: bool,

    /// Analyzer run time, reported in whole seconds
    #[arg(long, default_value_t = 0)]
    pub elapsed_ms: u64,

    /// Summary format written to stdout
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Baseline as updated by the analyzer
    #[arg(long, requires = "updated_baseline")]
    pub baseline: Option<PathBuf>,

    /// Sanitized baseline output
    #[arg(long, requires = "baseline")]
    pub updated_baseline: Option<PathBuf>,

    /// Exit with 1 when the verdict is failing
    #[arg(long)]
    pub exitcode: bool,
}

#[derive(Debug, ClapArgs)]
pub struct PruneArgs {
    #[arg(long)]
    pub partial_results_dir: PathBuf,

    /// Clear the directory entirely instead
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_lists_and_defaults() {
        let args = Args::parse_from([
            "lintbridge",
            "project",
            "--name",
            "//app",
            "--sources",
            "a.kt,b.kt",
            "--partial-results-dir",
            "p",
            "--models-dir",
            "m",
            "--project-xml",
            "project.xml",
        ]);
        let Command::Project(project) = args.command else {
            panic!("expected project subcommand");
        };
        assert_eq!(project.sources, vec!["a.kt", "b.kt"]);
        assert!(project.android);
        assert!(!project.library);
        assert_eq!(project.compile_sdk_version, "34");
        assert_eq!(project.min_sdk_version, "1");
        assert!(project.dependencies.is_empty());
    }

    #[test]
    fn policy_flags_take_explicit_values() {
        let args = Args::parse_from([
            "lintbridge",
            "-v",
            "report",
            "--name",
            "//app",
            "--results-xml",
            "r.xml",
            "--output-junit-xml",
            "j.xml",
            "--result-code",
            "code",
            "--fail-on-warning=false",
        ]);
        assert!(args.verbose);
        let Command::Report(report) = args.command else {
            panic!("expected report subcommand");
        };
        assert!(!report.fail_on_warning);
        assert!(report.fail_on_information);
        assert!(!report.exitcode);
    }

    #[test]
    fn baseline_flags_come_in_pairs() {
        let result = Args::try_parse_from([
            "lintbridge",
            "report",
            "--name",
            "//app",
            "--results-xml",
            "r.xml",
            "--output-junit-xml",
            "j.xml",
            "--result-code",
            "code",
            "--baseline",
            "b.xml",
        ]);
        assert!(result.is_err());
    }
}
