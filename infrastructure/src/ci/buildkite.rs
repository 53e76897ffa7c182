//! Buildkite CI context.
//!
//! Reads the Buildkite environment once, at construction. The rest of the
//! program sees it only through the [`CiContext`] port.

use consistency_application::ports::ci_context::CiContext;

const BUILDKITE: &str = "BUILDKITE";
const PULL_REQUEST: &str = "BUILDKITE_PULL_REQUEST";
const PULL_REQUEST_BASE_BRANCH: &str = "BUILDKITE_PULL_REQUEST_BASE_BRANCH";

/// Snapshot of the Buildkite environment variables that matter to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildkiteContext {
    in_buildkite: bool,
    pull_request: Option<String>,
    base_branch: Option<String>,
}

impl BuildkiteContext {
    /// Read the current process environment.
    ///
    /// Only the Buildkite variables are read; one that is not valid UTF-8
    /// counts as unset.
    pub fn from_env() -> Self {
        Self::from_vars(
            [BUILDKITE, PULL_REQUEST, PULL_REQUEST_BASE_BRANCH]
                .into_iter()
                .filter_map(|key| std::env::var(key).ok().map(|value| (key, value))),
        )
    }

    /// Build from explicit variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut context = Self::default();
        for (key, value) in vars {
            let value = value.into();
            match key.as_ref() {
                BUILDKITE => context.in_buildkite = value == "true",
                // Buildkite sets "false" outside pull request builds
                PULL_REQUEST if !value.is_empty() && value != "false" => {
                    context.pull_request = Some(value)
                }
                PULL_REQUEST_BASE_BRANCH if !value.is_empty() => {
                    context.base_branch = Some(value)
                }
                _ => {}
            }
        }
        context
    }

    /// Pull request number, when validating one.
    pub fn pull_request_number(&self) -> Option<&str> {
        self.pull_request.as_deref()
    }

    /// Branch the pull request targets.
    pub fn pull_request_base_branch(&self) -> Option<&str> {
        if self.is_pull_request_validation() {
            self.base_branch.as_deref()
        } else {
            None
        }
    }
}

impl CiContext for BuildkiteContext {
    fn is_in_ci(&self) -> bool {
        self.in_buildkite
    }

    fn is_pull_request_validation(&self) -> bool {
        self.in_buildkite && self.pull_request.is_some()
    }
}
