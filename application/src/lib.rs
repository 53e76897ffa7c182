//! Application layer for version-consistency
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_IMAGE_REPOSITORY, RunParams};
pub use ports::{
    ci_context::{CiContext, StaticCiContext},
    comparison_engine::{ComparisonEngine, EngineError},
    connection::{ConnectionError, ConnectionProvider, SqlConnection},
    progress::{NoProgress, WorkflowProgress},
    run_event_logger::{NoRunEventLogger, RunEvent, RunEventLogger},
    service_lifecycle::{ServiceError, ServiceLifecycle, ServiceOverrideGuard},
    version_control::{VcsError, VersionControl},
};
pub use use_cases::resolve_other_tag::{ResolutionPath, ResolveTagError, VersionResolver};
pub use use_cases::run_version_consistency::{
    FailureKind, RunReport, RunVersionConsistencyError, RunVersionConsistencyInput,
    RunVersionConsistencyUseCase,
};
