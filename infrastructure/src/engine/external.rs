//! Comparison engine run as a separate program.
//!
//! The program receives both endpoints, the strategy and the seed on its
//! command line, streams its own diagnostics to stderr and prints a JSON
//! [`TestSummary`] on stdout when done.

use crate::process;
use async_trait::async_trait;
use consistency_application::ports::comparison_engine::{ComparisonEngine, EngineError};
use consistency_application::ports::connection::SqlConnection;
use consistency_domain::{RunConfiguration, TestSummary};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub program: String,
    /// Arguments placed before the generated ones
    pub args: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            program: "output-consistency-test".to_string(),
            args: Vec::new(),
        }
    }
}

pub struct ExternalComparisonEngine {
    settings: EngineSettings,
}

impl ExternalComparisonEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Full argument list for one run.
    pub fn build_args(
        &self,
        this: &dyn SqlConnection,
        other: &dyn SqlConnection,
        config: &RunConfiguration,
    ) -> Vec<String> {
        let mut args = self.settings.args.clone();
        args.extend([
            "--this-host".to_string(),
            this.host().to_string(),
            "--this-port".to_string(),
            this.port().to_string(),
            "--other-host".to_string(),
            other.host().to_string(),
            "--other-port".to_string(),
            other.port().to_string(),
            "--evaluation-strategy".to_string(),
            config.strategy().to_string(),
            "--seed".to_string(),
            config.seed().to_string(),
        ]);
        args.extend(config.workload().to_args());
        args
    }
}

/// Read the summary from engine stdout: either the whole output is one JSON
/// document, or the summary is its last non-empty line.
pub(crate) fn parse_summary(stdout: &str) -> Result<TestSummary, EngineError> {
    let trimmed = stdout.trim();
    if let Ok(summary) = serde_json::from_str(trimmed) {
        return Ok(summary);
    }
    let last = trimmed
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| EngineError::InvalidSummary("empty output".to_string()))?;
    serde_json::from_str(last.trim()).map_err(|e| EngineError::InvalidSummary(e.to_string()))
}

#[async_trait]
impl ComparisonEngine for ExternalComparisonEngine {
    async fn run(
        &self,
        this: &dyn SqlConnection,
        other: &dyn SqlConnection,
        config: &RunConfiguration,
    ) -> Result<TestSummary, EngineError> {
        let args = self.build_args(this, other, config);
        info!(
            "Running comparison engine ({} strategy, seed {})",
            config.strategy(),
            config.seed()
        );
        debug!("{}", process::render(&self.settings.program, &args));

        let output = tokio::process::Command::from(process::command(
            &self.settings.program,
            &args,
            None,
        ))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| EngineError::Launch(format!("{}: {}", self.settings.program, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_summary(&stdout) {
            Ok(summary) => Ok(summary),
            // A crashed engine is an infrastructure problem, not a test verdict
            Err(_) if !output.status.success() => Err(EngineError::Exited {
                status: output.status.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}
