//! CI context port.
//!
//! Answers whether the process runs inside continuous integration and
//! whether that run validates a pull request. Injected into the
//! [`VersionResolver`](crate::use_cases::resolve_other_tag::VersionResolver)
//! instead of being read from process-global state.

/// Port for querying the CI environment.
pub trait CiContext: Send + Sync {
    /// Whether the process runs inside a CI system.
    fn is_in_ci(&self) -> bool;

    /// Whether the current CI run validates a pull request.
    fn is_pull_request_validation(&self) -> bool;
}

/// Fixed CI context, for local overrides and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticCiContext {
    pub in_ci: bool,
    pub pull_request: bool,
}

impl StaticCiContext {
    /// A developer machine.
    pub fn local() -> Self {
        Self::default()
    }

    /// A CI run after merge (not a pull request).
    pub fn ci_mainline() -> Self {
        Self {
            in_ci: true,
            pull_request: false,
        }
    }

    /// A CI run validating a pull request.
    pub fn ci_pull_request() -> Self {
        Self {
            in_ci: true,
            pull_request: true,
        }
    }
}

impl CiContext for StaticCiContext {
    fn is_in_ci(&self) -> bool {
        self.in_ci
    }

    fn is_pull_request_validation(&self) -> bool {
        self.pull_request
    }
}
