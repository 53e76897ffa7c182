//! Progress reporting for consistency runs

use colored::Colorize;
use consistency_application::WorkflowProgress;
use consistency_domain::{BuildTag, EvaluationStrategy, ServiceEndpoint, WorkflowState};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Reports progress with a spinner showing the current workflow state
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(WorkflowState::Idle.display_name());
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn state_message(state: WorkflowState) -> &'static str {
        match state {
            WorkflowState::Idle => "",
            WorkflowState::TornDown => "stale services removed",
            WorkflowState::Provisioning => "resolving run configuration",
            WorkflowState::Running => "comparing query results",
            WorkflowState::Evaluated => "evaluating summary",
            WorkflowState::Passed | WorkflowState::Failed => "",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowProgress for ProgressReporter {
    fn on_state_change(&self, _from: WorkflowState, to: WorkflowState) {
        match to {
            WorkflowState::Passed => self
                .spinner
                .finish_with_message(format!("{}", "all comparisons passed".green())),
            WorkflowState::Failed => self
                .spinner
                .finish_with_message(format!("{}", "comparisons failed".red())),
            state => {
                self.spinner.set_prefix(state.display_name());
                self.spinner.set_message(Self::state_message(state));
            }
        }
    }

    fn on_strategy_selected(&self, strategy: EvaluationStrategy, seed: u64) {
        self.spinner
            .println(format!("{} strategy {} (seed {})", "->".cyan(), strategy.to_string().bold(), seed));
    }

    fn on_other_tag_resolved(&self, tag: &BuildTag) {
        self.spinner
            .println(format!("{} baseline {}", "->".cyan(), tag.to_string().bold()));
    }

    fn on_service_started(&self, endpoint: &ServiceEndpoint) {
        self.spinner
            .println(format!("  {} {}", "v".green(), endpoint));
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl WorkflowProgress for SimpleProgress {
    fn on_state_change(&self, from: WorkflowState, to: WorkflowState) {
        eprintln!(
            "{} {} -> {}",
            "->".cyan(),
            from.display_name(),
            to.display_name().bold()
        );
    }

    fn on_strategy_selected(&self, strategy: EvaluationStrategy, seed: u64) {
        eprintln!("  strategy {} (seed {})", strategy, seed);
    }

    fn on_other_tag_resolved(&self, tag: &BuildTag) {
        eprintln!("  baseline {}", tag);
    }

    fn on_service_started(&self, endpoint: &ServiceEndpoint) {
        eprintln!("  {} {}", "v".green(), endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_finishes_on_terminal_state() {
        let reporter = ProgressReporter::new();
        reporter.on_state_change(WorkflowState::Idle, WorkflowState::TornDown);
        assert!(!reporter.spinner.is_finished());
        reporter.on_state_change(WorkflowState::Evaluated, WorkflowState::Passed);
        assert!(reporter.spinner.is_finished());
    }

    #[test]
    fn test_every_running_state_has_a_message() {
        for state in [
            WorkflowState::TornDown,
            WorkflowState::Provisioning,
            WorkflowState::Running,
            WorkflowState::Evaluated,
        ] {
            assert!(!ProgressReporter::state_message(state).is_empty());
        }
    }
}
