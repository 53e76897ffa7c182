//! Resolve Other Tag use case
//!
//! Decides which build the "other" instance runs:
//!
//! - CI run after merge → latest published release (`v<version>`), so true
//!   regressions against what users run are caught
//! - local run or pull-request validation → merge base with mainline
//!   (`devel-<commit>`), so unrelated mainline changes do not show up as
//!   differences

use crate::ports::ci_context::CiContext;
use crate::ports::version_control::{VcsError, VersionControl};
use consistency_domain::BuildTag;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors while resolving the baseline. There is no fallback tag.
#[derive(Error, Debug)]
pub enum ResolveTagError {
    #[error("Could not determine the latest release: {0}")]
    LatestRelease(#[source] VcsError),

    #[error("Could not determine the merge base: {0}")]
    MergeBase(#[source] VcsError),
}

/// Which baseline the resolver chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    LatestRelease,
    MergeBase,
}

impl ResolutionPath {
    /// Path taken for the given CI situation.
    pub fn for_context(ci: &dyn CiContext) -> Self {
        if ci.is_in_ci() && !ci.is_pull_request_validation() {
            ResolutionPath::LatestRelease
        } else {
            ResolutionPath::MergeBase
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPath::LatestRelease => "latest_release",
            ResolutionPath::MergeBase => "merge_base",
        }
    }
}

/// Resolves the [`BuildTag`] of the "other" instance.
pub struct VersionResolver {
    ci: Arc<dyn CiContext>,
    vcs: Arc<dyn VersionControl>,
}

impl VersionResolver {
    pub fn new(ci: Arc<dyn CiContext>, vcs: Arc<dyn VersionControl>) -> Self {
        Self { ci, vcs }
    }

    pub fn path(&self) -> ResolutionPath {
        ResolutionPath::for_context(self.ci.as_ref())
    }

    pub async fn resolve_other_tag(&self) -> Result<BuildTag, ResolveTagError> {
        match self.path() {
            ResolutionPath::LatestRelease => {
                let version = self
                    .vcs
                    .latest_release_version()
                    .await
                    .map_err(ResolveTagError::LatestRelease)?;
                info!("Using latest version ({}) for other instance", version);
                Ok(BuildTag::Release(version))
            }
            ResolutionPath::MergeBase => {
                let commit = self
                    .vcs
                    .merge_base_commit()
                    .await
                    .map_err(ResolveTagError::MergeBase)?;
                info!("Using merge base ({}) for other instance", commit);
                Ok(BuildTag::Devel(commit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ci_context::StaticCiContext;
    use async_trait::async_trait;
    use consistency_domain::{CommitId, ReleaseVersion};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Mocks ====================

    struct MockVcs {
        release: Option<&'static str>,
        merge_base: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl MockVcs {
        fn new(release: Option<&'static str>, merge_base: Option<&'static str>) -> Self {
            Self {
                release,
                merge_base,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VersionControl for MockVcs {
        async fn latest_release_version(&self) -> Result<ReleaseVersion, VcsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.release {
                Some(v) => Ok(v.parse().unwrap()),
                None => Err(VcsError::Unavailable("no network".into())),
            }
        }

        async fn merge_base_commit(&self) -> Result<CommitId, VcsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.merge_base {
                Some(c) => Ok(c.parse().unwrap()),
                None => Err(VcsError::CommandFailed {
                    command: "git merge-base HEAD origin/main".into(),
                    stderr: "fatal: Not a valid object name origin/main".into(),
                }),
            }
        }
    }

    fn resolver(ci: StaticCiContext, vcs: MockVcs) -> VersionResolver {
        VersionResolver::new(Arc::new(ci), Arc::new(vcs))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_ci_mainline_uses_latest_release() {
        let tag = resolver(StaticCiContext::ci_mainline(), MockVcs::new(Some("1.4.0"), Some("abc123")))
            .resolve_other_tag()
            .await
            .unwrap();
        assert_eq!(tag.to_string(), "v1.4.0");
    }

    #[tokio::test]
    async fn test_local_run_uses_merge_base() {
        let tag = resolver(StaticCiContext::local(), MockVcs::new(Some("1.4.0"), Some("abc123")))
            .resolve_other_tag()
            .await
            .unwrap();
        assert_eq!(tag.to_string(), "devel-abc123");
    }

    #[tokio::test]
    async fn test_release_tag_exactly_when_ci_and_not_pr() {
        for in_ci in [false, true] {
            for pull_request in [false, true] {
                let ci = StaticCiContext { in_ci, pull_request };
                let tag = resolver(ci, MockVcs::new(Some("0.130.0"), Some("deadbeef")))
                    .resolve_other_tag()
                    .await
                    .unwrap();
                let expect_release = in_ci && !pull_request;
                assert_eq!(tag.is_release(), expect_release, "ci={in_ci} pr={pull_request}");
                if expect_release {
                    assert!(tag.to_string().starts_with('v'));
                } else {
                    assert!(tag.to_string().starts_with("devel-"));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_release_lookup_failure_is_fatal() {
        let vcs = MockVcs::new(None, Some("abc123"));
        let err = resolver(StaticCiContext::ci_mainline(), vcs)
            .resolve_other_tag()
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveTagError::LatestRelease(VcsError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_merge_base_failure_does_not_fall_back_to_release() {
        let vcs = Arc::new(MockVcs::new(Some("1.4.0"), None));
        let resolver = VersionResolver::new(Arc::new(StaticCiContext::ci_pull_request()), vcs.clone());
        let err = resolver.resolve_other_tag().await.unwrap_err();
        assert!(matches!(err, ResolveTagError::MergeBase(_)));
        assert_eq!(vcs.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_path_names() {
        assert_eq!(
            ResolutionPath::for_context(&StaticCiContext::ci_mainline()).as_str(),
            "latest_release"
        );
        assert_eq!(
            ResolutionPath::for_context(&StaticCiContext::ci_pull_request()),
            ResolutionPath::MergeBase
        );
    }
}
