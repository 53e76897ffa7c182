//! Comparison result summary

use serde::{Deserialize, Serialize};

/// Aggregate outcome of one comparison run, produced by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSummary {
    /// Comparisons executed against both instances
    pub executed: usize,
    pub passed: usize,
    pub failed: usize,
    /// Human-readable description of each failed comparison
    pub failures: Vec<String>,
}

impl TestSummary {
    /// A summary where every one of `executed` comparisons passed.
    pub fn all_ok(executed: usize) -> Self {
        Self {
            executed,
            passed: executed,
            ..Default::default()
        }
    }

    /// Record one failed comparison.
    pub fn with_failure(mut self, description: impl Into<String>) -> Self {
        self.executed += 1;
        self.failed += 1;
        self.failures.push(description.into());
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.failures.is_empty()
    }
}

impl std::fmt::Display for TestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} executed, {} passed, {} failed",
            self.executed, self.passed, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ok_passes() {
        assert!(TestSummary::all_ok(12).all_passed());
        assert!(TestSummary::default().all_passed());
    }

    #[test]
    fn test_failure_fails() {
        let summary = TestSummary::all_ok(3).with_failure("SELECT 1/0 differs");
        assert!(!summary.all_passed());
        assert_eq!(summary.to_string(), "4 executed, 3 passed, 1 failed");
    }

    #[test]
    fn test_failure_messages_alone_fail_the_run() {
        let summary = TestSummary {
            failures: vec!["row count mismatch".into()],
            ..Default::default()
        };
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let summary: TestSummary = serde_json::from_str(r#"{"executed": 5, "passed": 5}"#).unwrap();
        assert!(summary.all_passed());
        assert_eq!(summary.executed, 5);
    }
}
