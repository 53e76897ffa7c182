//! Version control port.
//!
//! Looks up the two possible baselines: the latest published release and the
//! merge base of the current branch with mainline.

use async_trait::async_trait;
use consistency_domain::{CommitId, ReleaseVersion};
use thiserror::Error;

/// Errors from version control lookups. None of them has a fallback.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Version control unavailable: {0}")]
    Unavailable(String),

    #[error("No published release found")]
    NoRelease,

    #[error("Unexpected output: {0}")]
    InvalidOutput(String),
}

/// Port for version control lookups.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Latest published (non-prerelease) version.
    async fn latest_release_version(&self) -> Result<ReleaseVersion, VcsError>;

    /// Most recent commit shared by the current branch and mainline.
    async fn merge_base_commit(&self) -> Result<CommitId, VcsError>;
}
