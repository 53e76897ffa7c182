//! Infrastructure layer for version-consistency
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: CI detection, git lookups, docker compose services,
//! SQL connections, the comparison engine process, run-event logging and
//! configuration file loading.

pub mod ci;
pub mod compose;
pub mod config;
pub mod engine;
pub mod logging;
pub mod postgres;
mod process;
pub mod vcs;

// Re-export commonly used types
pub use ci::BuildkiteContext;
pub use compose::{ComposeSettings, DockerCompose};
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig, FileServicesConfig,
};
pub use engine::{EngineSettings, ExternalComparisonEngine};
pub use logging::JsonlRunEventLogger;
pub use postgres::{PgConnection, PgConnectionProvider, PgSettings};
pub use vcs::{GitSettings, GitVersionControl};
