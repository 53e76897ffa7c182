//! CLI entrypoint for version-consistency
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use consistency_application::{
    FailureKind, NoProgress, RunReport, RunVersionConsistencyError, RunVersionConsistencyInput,
    RunVersionConsistencyUseCase, WorkflowProgress,
};
use consistency_infrastructure::{
    BuildkiteContext, ConfigLoader, DockerCompose, ExternalComparisonEngine, FileConfig,
    GitVersionControl, JsonlRunEventLogger, PgConnectionProvider,
};
use consistency_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status when a comparison failed
const EXIT_TEST_FAILURE: u8 = 1;
/// Exit status for configuration, resolution and infrastructure errors
const EXIT_ERROR: u8 = 2;
/// Exit status after SIGINT (Ctrl-C)
const EXIT_INTERRUPTED: u8 = 130;
/// Exit status after SIGTERM (e.g. a cancelled CI job)
const EXIT_TERMINATED: u8 = 143;

/// Signal that ended a run early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    Interrupt,
    Terminate,
}

impl Shutdown {
    fn exit_status(self) -> u8 {
        match self {
            Shutdown::Interrupt => EXIT_INTERRUPTED,
            Shutdown::Terminate => EXIT_TERMINATED,
        }
    }
}

/// Handlers for the signals that cancel a run. Installing them replaces the
/// default disposition, so the process survives long enough to restore the
/// services.
struct ShutdownSignals {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    fn install() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> Shutdown {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => Shutdown::Interrupt,
                _ = self.terminate.recv() => Shutdown::Terminate,
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            Shutdown::Interrupt
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
        println!(
            "{}",
            toml::to_string_pretty(&config).context("Failed to render configuration")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);

    // === Dependency Injection ===
    let ci = BuildkiteContext::from_env();
    let vcs = GitVersionControl::new(config.vcs.clone())
        .context("Version control unavailable")?
        .with_target_branch(ci.pull_request_base_branch());
    let services = DockerCompose::new(config.services.compose_settings())
        .context("Service runtime unavailable")?;
    let connections = PgConnectionProvider::new(config.connection.clone());
    let engine = ExternalComparisonEngine::new(config.engine.clone());

    let mut use_case = RunVersionConsistencyUseCase::new(
        Arc::new(ci),
        Arc::new(vcs),
        Arc::new(services),
        Arc::new(connections),
        Arc::new(engine),
    )
    .with_params(config.run_params());

    if let Some(path) = cli.run_log.as_ref().or(config.output.run_log.as_ref()) {
        match JsonlRunEventLogger::open(path) {
            Ok(logger) => {
                info!("Writing run events to {}", logger.path().display());
                use_case = use_case.with_run_log(Arc::new(logger));
            }
            Err(e) => warn!("Could not open run log {}: {}", path.display(), e),
        }
    }

    let input = RunVersionConsistencyInput::new(seed)
        .with_strategy(cli.strategy())
        .with_workload(cli.workload_args());
    let image_repository = config.services.image_repository.as_str();

    if cli.print_plan {
        return Ok(match use_case.plan(&input).await {
            Ok(plan) => {
                println!("{}", ConsoleFormatter::format_plan(&plan, image_repository));
                ExitCode::SUCCESS
            }
            Err(e) => report_error(&e),
        });
    }

    let progress: Box<dyn WorkflowProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let mut signals = ShutdownSignals::install().context("Failed to install signal handlers")?;

    // Dropping the run future drops its service override, which restores
    // the topology before we exit.
    let outcome = tokio::select! {
        result = use_case.execute_with_progress(input, progress.as_ref()) => result,
        shutdown = signals.recv() => {
            warn!("Received {:?}; services restored", shutdown);
            return Ok(ExitCode::from(shutdown.exit_status()));
        }
    };
    drop(progress);

    Ok(match outcome {
        Ok(report) => {
            print_report(&report, cli.output, image_repository);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(report) = e.report() {
                print_report(report, cli.output, image_repository);
            }
            report_error(&e)
        }
    })
}

fn print_report(report: &RunReport, format: OutputFormat, image_repository: &str) {
    let output = match format {
        OutputFormat::Text => ConsoleFormatter::format_report(report, image_repository),
        OutputFormat::Json => ConsoleFormatter::format_json(report),
    };
    println!("{}", output);
}

fn report_error(error: &RunVersionConsistencyError) -> ExitCode {
    eprintln!("Error: {}", error);
    ExitCode::from(exit_status(error.kind()))
}

fn exit_status(kind: FailureKind) -> u8 {
    match kind {
        FailureKind::TestFailure => EXIT_TEST_FAILURE,
        FailureKind::Configuration | FailureKind::Resolution | FailureKind::Infrastructure => {
            EXIT_ERROR
        }
    }
}
