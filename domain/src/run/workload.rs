//! Workload generator arguments
//!
//! These belong to the comparison engine; the workflow only carries them
//! through to it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadArgs {
    /// Stop generating queries after this many seconds
    pub max_runtime_in_sec: Option<u64>,
    /// Stop after this many query iterations
    pub max_iterations: Option<u64>,
    /// Abort on the first failed comparison
    pub fail_fast: bool,
    /// Generate queries without executing them
    pub dry_run: bool,
    /// Print every query and both results
    pub verbose_output: bool,
    /// Passed to the engine verbatim
    pub extra: Vec<String>,
}

impl WorkloadArgs {
    /// Render as command-line arguments for the engine.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(secs) = self.max_runtime_in_sec {
            args.push("--max-runtime-in-sec".to_string());
            args.push(secs.to_string());
        }
        if let Some(iterations) = self.max_iterations {
            args.push("--max-iterations".to_string());
            args.push(iterations.to_string());
        }
        if self.fail_fast {
            args.push("--fail-fast".to_string());
        }
        if self.dry_run {
            args.push("--dry-run".to_string());
        }
        if self.verbose_output {
            args.push("--verbose-output".to_string());
        }
        args.extend(self.extra.iter().cloned());
        args
    }
}
