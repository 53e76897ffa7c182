//! Console output formatter for run reports

use colored::Colorize;
use consistency_application::RunReport;
use consistency_domain::{RunConfiguration, WorkflowState};

/// Formats run plans and reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the resolved configuration of a run that has not started
    pub fn format_plan(config: &RunConfiguration, image_repository: &str) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Version Consistency Plan"));
        output.push('\n');
        output.push_str(&Self::configuration(config, image_repository));
        output.push_str(&Self::footer());
        output
    }

    /// Format the complete run report
    pub fn format_report(report: &RunReport, image_repository: &str) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Version Consistency Results"));
        output.push('\n');
        output.push_str(&Self::configuration(&report.config, image_repository));

        if report.this_version.is_some() || report.other_version.is_some() {
            output.push_str(&Self::section_header("Server Versions"));
            let unknown = "unknown".dimmed().to_string();
            output.push_str(&format!(
                "  {:<8}{}\n  {:<8}{}\n",
                "this",
                report.this_version.as_deref().unwrap_or(&unknown),
                "other",
                report.other_version.as_deref().unwrap_or(&unknown)
            ));
        }

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&format!("  {}\n", report.summary));
        if !report.summary.failures.is_empty() {
            output.push_str(&format!("\n{}\n", "Failures:".red().bold()));
            for failure in &report.summary.failures {
                output.push_str(&format!("  * {}\n", failure));
            }
        }

        let verdict = match report.final_state() {
            WorkflowState::Passed => "PASSED".green().bold(),
            WorkflowState::Failed => "FAILED".red().bold(),
            other => other.display_name().yellow().bold(),
        };
        output.push_str(&format!("\n{} {}\n", "Result:".cyan().bold(), verdict));
        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &RunReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn configuration(config: &RunConfiguration, image_repository: &str) -> String {
        let endpoints = config.endpoints();
        let mut output = String::new();
        output.push_str(&format!(
            "{} {} (seed {})\n",
            "Strategy:".cyan().bold(),
            config.strategy(),
            config.seed()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Baseline:".cyan().bold(),
            config.other_tag().image(image_repository)
        ));
        output.push_str(&format!(
            "{}\n  {:<8}{}\n  {:<8}{}\n",
            "Endpoints:".cyan().bold(),
            "this",
            endpoints.this,
            "other",
            endpoints.other
        ));

        let args = config.workload().to_args();
        if !args.is_empty() {
            output.push_str(&format!("{} {}\n", "Workload:".cyan().bold(), args.join(" ")));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consistency_domain::{
        BuildTag, CommitId, EndpointLayout, EvaluationStrategy, TestSummary, WorkloadArgs,
    };

    fn config() -> RunConfiguration {
        RunConfiguration::new(
            WorkloadArgs {
                max_iterations: Some(100),
                ..Default::default()
            },
            EvaluationStrategy::Sequential,
            42,
            BuildTag::Devel("abc123".parse::<CommitId>().unwrap()),
            EndpointLayout::default().assign().unwrap(),
        )
    }

    fn report(summary: TestSummary, last: WorkflowState) -> RunReport {
        RunReport {
            config: config(),
            summary,
            this_version: Some("v0.131.0-dev".to_string()),
            other_version: None,
            states: vec![WorkflowState::Idle, WorkflowState::Evaluated, last],
        }
    }

    #[test]
    fn test_plan_shows_baseline_and_ports() {
        colored::control::set_override(false);
        let plan = ConsoleFormatter::format_plan(&config(), "materialize/materialized");
        assert!(plan.contains("Strategy: sequential (seed 42)"));
        assert!(plan.contains("Baseline: materialize/materialized:devel-abc123"));
        assert!(plan.contains("mz_this (6875:6875)"));
        assert!(plan.contains("mz_other (16875:6875)"));
        assert!(plan.contains("Workload: --max-iterations 100"));
    }

    #[test]
    fn test_report_lists_failures() {
        colored::control::set_override(false);
        let summary = TestSummary::all_ok(3).with_failure("query 2 differs");
        let text = ConsoleFormatter::format_report(
            &report(summary, WorkflowState::Failed),
            "materialize/materialized",
        );
        assert!(text.contains("query 2 differs"));
        assert!(text.contains("Result: FAILED"));
        assert!(text.contains("unknown"));
    }

    #[test]
    fn test_report_passed() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_report(
            &report(TestSummary::all_ok(5), WorkflowState::Passed),
            "materialize/materialized",
        );
        assert!(text.contains("Result: PASSED"));
        assert!(!text.contains("Failures:"));
    }

    #[test]
    fn test_json_report() {
        let json = ConsoleFormatter::format_json(&report(
            TestSummary::all_ok(5),
            WorkflowState::Passed,
        ));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["executed"], 5);
        assert_eq!(value["states"][2], "passed");
        assert_eq!(value["config"]["strategy"], "sequential");
    }
}
