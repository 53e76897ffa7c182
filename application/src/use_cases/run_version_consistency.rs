//! Run Version Consistency use case
//!
//! Orchestrates one comparison of the locally built instance ("this")
//! against a baseline build ("other"):
//!
//! 1. Tear down any stale services and volumes
//! 2. Resolve the run configuration (strategy, baseline tag, endpoints)
//! 3. Override both services and start them
//! 4. Connect to both and hand them to the comparison engine
//! 5. Pass or fail on the engine's summary
//!
//! Nothing is retried. The service override is reverted on every exit path.

use crate::config::RunParams;
use crate::ports::ci_context::CiContext;
use crate::ports::comparison_engine::{ComparisonEngine, EngineError};
use crate::ports::connection::{ConnectionError, ConnectionProvider, SqlConnection};
use crate::ports::progress::{NoProgress, WorkflowProgress};
use crate::ports::run_event_logger::{NoRunEventLogger, RunEvent, RunEventLogger};
use crate::ports::service_lifecycle::{ServiceError, ServiceLifecycle};
use crate::ports::version_control::VersionControl;
use crate::use_cases::resolve_other_tag::{ResolveTagError, VersionResolver};
use consistency_domain::{
    DomainError, RunConfiguration, StrategyChoice, TestSummary, WorkflowState, WorkflowTracker,
    WorkloadArgs, select_strategy,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Broad class of a run failure, used to pick the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Invalid settings; nothing was started
    Configuration,
    /// Baseline could not be determined; nothing was started
    Resolution,
    /// The harness broke (services, connections, engine)
    Infrastructure,
    /// The product regressed
    TestFailure,
}

/// Errors that can occur during a consistency run
#[derive(Error, Debug)]
pub enum RunVersionConsistencyError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[source] DomainError),

    #[error("Workflow error: {0}")]
    Workflow(#[source] DomainError),

    #[error("{0}")]
    Resolution(#[from] ResolveTagError),

    #[error("Teardown failed: {0}")]
    Teardown(#[source] ServiceError),

    #[error("Service setup failed: {0}")]
    Services(#[source] ServiceError),

    #[error("Connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("At least one test failed ({})", .report.summary)]
    TestsFailed { report: Box<RunReport> },
}

impl RunVersionConsistencyError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Resolution(_) => FailureKind::Resolution,
            Self::Workflow(_)
            | Self::Teardown(_)
            | Self::Services(_)
            | Self::Connection(_)
            | Self::Engine(_) => FailureKind::Infrastructure,
            Self::TestsFailed { .. } => FailureKind::TestFailure,
        }
    }

    /// Check if this error is a semantic test failure rather than a harness failure
    pub fn is_test_failure(&self) -> bool {
        self.kind() == FailureKind::TestFailure
    }

    /// The run report, when the run got as far as evaluation
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            Self::TestsFailed { report } => Some(report.as_ref()),
            _ => None,
        }
    }
}

/// Input for the RunVersionConsistency use case
#[derive(Debug, Clone)]
pub struct RunVersionConsistencyInput {
    /// Requested evaluation strategy (possibly `random`)
    pub strategy: StrategyChoice,
    /// Seed for strategy selection and the workload generator
    pub seed: u64,
    /// Arguments forwarded to the comparison engine
    pub workload: WorkloadArgs,
}

impl RunVersionConsistencyInput {
    pub fn new(seed: u64) -> Self {
        Self {
            strategy: StrategyChoice::Random,
            seed,
            workload: WorkloadArgs::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: StrategyChoice) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_workload(mut self, workload: WorkloadArgs) -> Self {
        self.workload = workload;
        self
    }
}

/// Outcome of a run that reached evaluation
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: RunConfiguration,
    pub summary: TestSummary,
    /// Server versions reported by "this" and "other"
    pub this_version: Option<String>,
    pub other_version: Option<String>,
    /// States visited, `Idle` first
    pub states: Vec<WorkflowState>,
}

impl RunReport {
    pub fn final_state(&self) -> WorkflowState {
        self.states.last().copied().unwrap_or(WorkflowState::Idle)
    }
}

/// What the running phase produced before evaluation
struct Evaluation {
    summary: TestSummary,
    this_version: Option<String>,
    other_version: Option<String>,
}

/// Use case for running a version consistency comparison
pub struct RunVersionConsistencyUseCase {
    resolver: VersionResolver,
    services: Arc<dyn ServiceLifecycle>,
    connections: Arc<dyn ConnectionProvider>,
    engine: Arc<dyn ComparisonEngine>,
    params: RunParams,
    run_log: Arc<dyn RunEventLogger>,
}

impl RunVersionConsistencyUseCase {
    pub fn new(
        ci: Arc<dyn CiContext>,
        vcs: Arc<dyn VersionControl>,
        services: Arc<dyn ServiceLifecycle>,
        connections: Arc<dyn ConnectionProvider>,
        engine: Arc<dyn ComparisonEngine>,
    ) -> Self {
        Self {
            resolver: VersionResolver::new(ci, vcs),
            services,
            connections,
            engine,
            params: RunParams::default(),
            run_log: Arc::new(NoRunEventLogger),
        }
    }

    pub fn with_params(mut self, params: RunParams) -> Self {
        self.params = params;
        self
    }

    /// Create with a run-event logger.
    pub fn with_run_log(mut self, logger: Arc<dyn RunEventLogger>) -> Self {
        self.run_log = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunVersionConsistencyInput,
    ) -> Result<RunReport, RunVersionConsistencyError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Resolve the run configuration without touching any service
    pub async fn plan(
        &self,
        input: &RunVersionConsistencyInput,
    ) -> Result<RunConfiguration, RunVersionConsistencyError> {
        self.provision(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunVersionConsistencyInput,
        progress: &dyn WorkflowProgress,
    ) -> Result<RunReport, RunVersionConsistencyError> {
        let mut tracker = WorkflowTracker::new();

        // Idle -> Torn Down
        info!("Destroying stale services and volumes");
        self.services
            .destroy_all(true)
            .await
            .map_err(RunVersionConsistencyError::Teardown)?;
        self.transition(&mut tracker, WorkflowState::TornDown, progress)?;

        // Torn Down -> Provisioning
        self.transition(&mut tracker, WorkflowState::Provisioning, progress)?;
        let config = self.provision(&input, progress).await?;
        self.run_log.log(RunEvent::new(
            "run_configured",
            serde_json::to_value(&config).unwrap_or_default(),
        ));

        // Provisioning -> Running -> Evaluated, under the override
        let specs = config.service_specs(&self.params.image_repository);
        let guard = self
            .services
            .override_services(&specs)
            .await
            .map_err(RunVersionConsistencyError::Services)?;
        debug!("Overrode services: {}", guard.services().join(", "));

        let outcome = self.run_services(&config, &mut tracker, progress).await;

        if let Err(e) = guard.release().await {
            warn!("Could not restore the service topology: {}", e);
            self.run_log.log(RunEvent::new(
                "restore_failed",
                json!({ "error": e.to_string() }),
            ));
        }

        let evaluation = outcome?;

        // Evaluated -> Passed | Failed
        let passed = evaluation.summary.all_passed();
        let final_state = if passed {
            WorkflowState::Passed
        } else {
            WorkflowState::Failed
        };
        self.transition(&mut tracker, final_state, progress)?;
        self.run_log.log(RunEvent::new(
            "run_finished",
            json!({
                "passed": passed,
                "summary": &evaluation.summary,
            }),
        ));

        let report = RunReport {
            config,
            summary: evaluation.summary,
            this_version: evaluation.this_version,
            other_version: evaluation.other_version,
            states: tracker.history().to_vec(),
        };

        if passed {
            info!("All comparisons passed ({})", report.summary);
            Ok(report)
        } else {
            Err(RunVersionConsistencyError::TestsFailed {
                report: Box::new(report),
            })
        }
    }

    /// Build the run configuration: strategy, baseline tag, endpoints
    async fn provision(
        &self,
        input: &RunVersionConsistencyInput,
        progress: &dyn WorkflowProgress,
    ) -> Result<RunConfiguration, RunVersionConsistencyError> {
        let strategy = select_strategy(input.strategy, input.seed);
        info!(
            "Using evaluation strategy {} (requested {}, seed {})",
            strategy, input.strategy, input.seed
        );
        progress.on_strategy_selected(strategy, input.seed);

        let path = self.resolver.path();
        let other_tag = self.resolver.resolve_other_tag().await?;
        info!("Using {} as tag for other version", other_tag);
        progress.on_other_tag_resolved(&other_tag);
        self.run_log.log(RunEvent::new(
            "tag_resolved",
            json!({ "path": path.as_str(), "tag": other_tag.to_string() }),
        ));

        let endpoints = self
            .params
            .layout
            .assign()
            .map_err(RunVersionConsistencyError::Configuration)?;

        Ok(RunConfiguration::new(
            input.workload.clone(),
            strategy,
            input.seed,
            other_tag,
            endpoints,
        ))
    }

    /// Start both services, connect, and run the comparison engine
    async fn run_services(
        &self,
        config: &RunConfiguration,
        tracker: &mut WorkflowTracker,
        progress: &dyn WorkflowProgress,
    ) -> Result<Evaluation, RunVersionConsistencyError> {
        let endpoints = config.endpoints();

        for endpoint in [&endpoints.this, &endpoints.other] {
            info!("Starting {}", endpoint);
            self.services
                .start(&endpoint.service)
                .await
                .map_err(RunVersionConsistencyError::Services)?;
            progress.on_service_started(endpoint);
        }
        self.transition(tracker, WorkflowState::Running, progress)?;

        let this = self
            .connections
            .connect(&endpoints.this.service, endpoints.this.internal_port)
            .await?;
        let other = self
            .connections
            .connect(&endpoints.other.service, endpoints.other.internal_port)
            .await?;

        let this_version = Self::probe_version(this.as_ref()).await;
        let other_version = Self::probe_version(other.as_ref()).await;

        info!(
            "Running comparison with strategy {} and seed {}",
            config.strategy(),
            config.seed()
        );
        let summary = self
            .engine
            .run(this.as_ref(), other.as_ref(), config)
            .await?;
        self.transition(tracker, WorkflowState::Evaluated, progress)?;

        Ok(Evaluation {
            summary,
            this_version,
            other_version,
        })
    }

    /// Server version for diagnostics; failures here are not fatal
    async fn probe_version(connection: &dyn SqlConnection) -> Option<String> {
        match connection.server_version().await {
            Ok(version) => {
                info!("{} reports version {}", connection.service(), version);
                Some(version)
            }
            Err(e) => {
                warn!("Could not read version of {}: {}", connection.service(), e);
                None
            }
        }
    }

    fn transition(
        &self,
        tracker: &mut WorkflowTracker,
        next: WorkflowState,
        progress: &dyn WorkflowProgress,
    ) -> Result<(), RunVersionConsistencyError> {
        let previous = tracker
            .advance(next)
            .map_err(RunVersionConsistencyError::Workflow)?;
        debug!("Workflow: {} -> {}", previous, next);
        progress.on_state_change(previous, next);
        self.run_log.log(RunEvent::new(
            "state_change",
            json!({ "from": previous.as_str(), "to": next.as_str() }),
        ));
        Ok(())
    }
}
