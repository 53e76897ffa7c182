//! Progress notification port
//!
//! Defines the interface for reporting progress during a consistency run.

use consistency_domain::{BuildTag, EvaluationStrategy, ServiceEndpoint, WorkflowState};

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait WorkflowProgress: Send + Sync {
    /// Called after every state transition
    fn on_state_change(&self, from: WorkflowState, to: WorkflowState);

    /// Called once the evaluation strategy is fixed
    fn on_strategy_selected(&self, _strategy: EvaluationStrategy, _seed: u64) {}

    /// Called once the baseline build tag is resolved
    fn on_other_tag_resolved(&self, _tag: &BuildTag) {}

    /// Called when a service is up
    fn on_service_started(&self, _endpoint: &ServiceEndpoint) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl WorkflowProgress for NoProgress {
    fn on_state_change(&self, _from: WorkflowState, _to: WorkflowState) {}
}
