//! Workflow state machine of a consistency run

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// State of a consistency run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    /// Stale services and volumes destroyed
    TornDown,
    /// Run configuration resolved
    Provisioning,
    /// Both instances up under the service override
    Running,
    /// Comparison engine returned a summary
    Evaluated,
    Passed,
    Failed,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::TornDown => "torn_down",
            WorkflowState::Provisioning => "provisioning",
            WorkflowState::Running => "running",
            WorkflowState::Evaluated => "evaluated",
            WorkflowState::Passed => "passed",
            WorkflowState::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::TornDown => "Torn Down",
            WorkflowState::Provisioning => "Provisioning",
            WorkflowState::Running => "Running",
            WorkflowState::Evaluated => "Evaluated",
            WorkflowState::Passed => "Passed",
            WorkflowState::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Passed | WorkflowState::Failed)
    }

    pub fn can_transition_to(&self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (self, next),
            (Idle, TornDown)
                | (TornDown, Provisioning)
                | (Provisioning, Running)
                | (Running, Evaluated)
                | (Evaluated, Passed)
                | (Evaluated, Failed)
        )
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tracks the current state of one run and the path it took.
#[derive(Debug, Clone)]
pub struct WorkflowTracker {
    history: Vec<WorkflowState>,
}

impl Default for WorkflowTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowTracker {
    pub fn new() -> Self {
        Self {
            history: vec![WorkflowState::Idle],
        }
    }

    pub fn current(&self) -> WorkflowState {
        self.history
            .last()
            .copied()
            .unwrap_or(WorkflowState::Idle)
    }

    /// States visited so far, starting with `Idle`.
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    /// Move to `next`, returning the previous state.
    pub fn advance(&mut self, next: WorkflowState) -> Result<WorkflowState, DomainError> {
        let current = self.current();
        if !current.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.history.push(next);
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut tracker = WorkflowTracker::new();
        for state in [
            WorkflowState::TornDown,
            WorkflowState::Provisioning,
            WorkflowState::Running,
            WorkflowState::Evaluated,
            WorkflowState::Passed,
        ] {
            tracker.advance(state).unwrap();
        }
        assert_eq!(tracker.current(), WorkflowState::Passed);
        assert!(tracker.current().is_terminal());
        assert_eq!(tracker.history().len(), 6);
    }

    #[test]
    fn test_skipping_teardown_is_rejected() {
        let mut tracker = WorkflowTracker::new();
        let err = tracker.advance(WorkflowState::Provisioning).unwrap_err();
        assert_eq!(err.to_string(), "Invalid workflow transition: idle -> provisioning");
        assert_eq!(tracker.current(), WorkflowState::Idle);
    }

    #[test]
    fn test_terminal_states_are_final() {
        for terminal in [WorkflowState::Passed, WorkflowState::Failed] {
            assert!(!terminal.can_transition_to(WorkflowState::Idle));
            assert!(!terminal.can_transition_to(WorkflowState::Evaluated));
        }
    }

    #[test]
    fn test_evaluated_branches() {
        assert!(WorkflowState::Evaluated.can_transition_to(WorkflowState::Passed));
        assert!(WorkflowState::Evaluated.can_transition_to(WorkflowState::Failed));
        assert!(!WorkflowState::Running.can_transition_to(WorkflowState::Failed));
    }
}
