//! Domain layer for version-consistency
//!
//! This crate contains the core types and decision logic of a version
//! consistency run. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## This / Other
//!
//! A run compares two instances of the database:
//!
//! - **This**: the locally built candidate under test
//! - **Other**: a baseline build, identified by a [`BuildTag`] (latest release
//!   or merge-base development build)
//!
//! ## Evaluation Strategy
//!
//! Governs how the comparison engine issues and checks queries. Users may ask
//! for `random`, resolved once from the run seed by [`select_strategy`].

pub mod core;
pub mod run;
pub mod service;
pub mod strategy;
pub mod version;

// Re-export commonly used types
pub use core::error::DomainError;
pub use run::{
    configuration::RunConfiguration,
    state::{WorkflowState, WorkflowTracker},
    summary::TestSummary,
    workload::WorkloadArgs,
};
pub use service::{
    endpoint::{
        DEFAULT_INTERNAL_PORT, DEFAULT_OTHER_PORT_OFFSET, DEFAULT_OTHER_SERVICE,
        DEFAULT_THIS_SERVICE, EndpointLayout, EndpointPair, ServiceEndpoint,
    },
    spec::ServiceSpec,
};
pub use strategy::{
    evaluation::{EvaluationStrategy, RANDOM_STRATEGY_NAME, StrategyChoice},
    selector::{choose_seeded, select_strategy, select_strategy_by_name},
};
pub use version::{build_tag::BuildTag, commit::CommitId, release::ReleaseVersion};
