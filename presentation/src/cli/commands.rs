//! CLI command definitions

use clap::{Args, Parser, ValueEnum};
use consistency_domain::{EvaluationStrategy, StrategyChoice, WorkloadArgs};
use std::path::PathBuf;

/// Evaluation strategy accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EvaluationStrategyArg {
    /// Run every query on "this", then on "other"
    Sequential,
    /// Alternate between the instances query by query
    Interleaved,
    /// Pick one of the above from the seed
    #[default]
    Random,
}

impl From<EvaluationStrategyArg> for StrategyChoice {
    fn from(arg: EvaluationStrategyArg) -> Self {
        match arg {
            EvaluationStrategyArg::Sequential => {
                StrategyChoice::Named(EvaluationStrategy::Sequential)
            }
            EvaluationStrategyArg::Interleaved => {
                StrategyChoice::Named(EvaluationStrategy::Interleaved)
            }
            EvaluationStrategyArg::Random => StrategyChoice::Random,
        }
    }
}

/// Output format for the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON report
    Json,
}

/// Workload generator options, forwarded to the comparison engine
#[derive(Args, Debug, Clone, Default)]
pub struct WorkloadOptions {
    /// Stop generating queries after this many seconds
    #[arg(long, value_name = "SECS")]
    pub max_runtime_in_sec: Option<u64>,

    /// Stop after this many query iterations
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<u64>,

    /// Abort on the first failed comparison
    #[arg(long)]
    pub fail_fast: bool,

    /// Generate queries without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print every query and both results
    #[arg(long)]
    pub verbose_output: bool,
}

/// CLI arguments for version-consistency
#[derive(Parser, Debug)]
#[command(name = "version-consistency")]
#[command(
    author,
    version,
    about = "Compare query results of the local build against a baseline version"
)]
#[command(long_about = r#"
Runs the output consistency workload against two database instances and
fails if their results differ:

  this   the locally built image          (host port 6875)
  other  the baseline image               (host port 16875)

The baseline is the latest release when running in CI outside of pull request
validation, and the merge base with mainline otherwise.

Configuration files are loaded from (in priority order):
1. VERSION_CONSISTENCY_<SECTION>__<KEY> environment variables
2. --config <path>                Explicit config file
3. ./version-consistency.toml     Project-level config
4. ~/.config/version-consistency/config.toml   Global config

Example:
  version-consistency --seed 42 --max-iterations 1000
  version-consistency --evaluation-strategy interleaved -- --max-cols-per-query 8
"#)]
pub struct Cli {
    /// Evaluation strategy of the comparison engine
    #[arg(long, value_enum, default_value_t = EvaluationStrategyArg::Random)]
    pub evaluation_strategy: EvaluationStrategyArg,

    /// Seed for strategy selection and query generation (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub workload: WorkloadOptions,

    /// Extra arguments passed to the comparison engine verbatim
    #[arg(last = true, value_name = "ENGINE_ARGS")]
    pub engine_args: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Print the resolved run configuration without starting services
    #[arg(long)]
    pub print_plan: bool,

    /// Append structured run events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub run_log: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show the merged configuration and its sources, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Workload arguments including the trailing engine arguments
    pub fn workload_args(&self) -> WorkloadArgs {
        WorkloadArgs {
            max_runtime_in_sec: self.workload.max_runtime_in_sec,
            max_iterations: self.workload.max_iterations,
            fail_fast: self.workload.fail_fast,
            dry_run: self.workload.dry_run,
            verbose_output: self.workload.verbose_output,
            extra: self.engine_args.clone(),
        }
    }

    pub fn strategy(&self) -> StrategyChoice {
        self.evaluation_strategy.into()
    }
}
