//! Comparison engine port.
//!
//! The engine generates the workload, runs it against both connections
//! according to the run's evaluation strategy and diffs the outcomes. It is a
//! single blocking step from the workflow's point of view.

use crate::ports::connection::SqlConnection;
use async_trait::async_trait;
use consistency_domain::{RunConfiguration, TestSummary};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to launch comparison engine: {0}")]
    Launch(String),

    #[error("Comparison engine exited with {status} without a summary")]
    Exited { status: String },

    #[error("Comparison engine produced an unreadable summary: {0}")]
    InvalidSummary(String),
}

#[async_trait]
pub trait ComparisonEngine: Send + Sync {
    /// Run the comparison of `this` against `other`.
    ///
    /// Failed comparisons are reported in the summary, not as an error.
    async fn run(
        &self,
        this: &dyn SqlConnection,
        other: &dyn SqlConnection,
        config: &RunConfiguration,
    ) -> Result<TestSummary, EngineError>;
}
