//! Git version control adapter.
//!
//! Resolves both baselines with the `git` CLI:
//!
//! - latest release: highest stable version among tags matching the release
//!   pattern (after `git fetch --tags` when fetching is enabled)
//! - merge base: `git merge-base HEAD <remote>/<branch>` (after fetching the
//!   branch when enabled)

use crate::process;
use async_trait::async_trait;
use consistency_application::ports::version_control::{VcsError, VersionControl};
use consistency_domain::{CommitId, ReleaseVersion};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Git lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Remote holding release tags and mainline; empty means local refs only
    pub remote: String,
    /// Branch merge bases are computed against
    pub mainline_branch: String,
    /// Fetch tags / the target branch before looking them up
    pub fetch: bool,
    /// Glob of release tags
    pub release_tag_pattern: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            mainline_branch: "main".to_string(),
            fetch: true,
            release_tag_pattern: "v*".to_string(),
        }
    }
}

/// [`VersionControl`] backed by the `git` CLI.
pub struct GitVersionControl {
    settings: GitSettings,
    target_branch: String,
    working_dir: Option<PathBuf>,
}

impl GitVersionControl {
    /// Create an adapter, checking that `git` is installed.
    pub fn new(settings: GitSettings) -> Result<Self, VcsError> {
        if which::which("git").is_err() {
            return Err(VcsError::Unavailable("git not found in PATH".to_string()));
        }
        Ok(Self {
            target_branch: settings.mainline_branch.clone(),
            settings,
            working_dir: None,
        })
    }

    /// Compute the merge base against `branch` instead of mainline, e.g. the
    /// base branch of the pull request being validated.
    pub fn with_target_branch(mut self, branch: Option<&str>) -> Self {
        if let Some(branch) = branch {
            self.target_branch = branch.to_string();
        }
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Ref the merge base is computed against.
    pub fn target_ref(&self) -> String {
        if self.settings.remote.is_empty() {
            self.target_branch.clone()
        } else {
            format!("{}/{}", self.settings.remote, self.target_branch)
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String, VcsError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let rendered = process::render("git", &args);
        debug!("Running {}", rendered);

        let output = process::output("git", &args, self.working_dir.as_deref())
            .await
            .map_err(|e| VcsError::Unavailable(format!("failed to execute git: {}", e)))?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command: rendered,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }

    async fn fetch(&self, what: &[&str]) -> Result<(), VcsError> {
        if !self.settings.fetch || self.settings.remote.is_empty() {
            return Ok(());
        }
        let mut args = vec!["fetch", "--quiet", self.settings.remote.as_str()];
        args.extend_from_slice(what);
        self.git(&args).await.map(|_| ())
    }
}

#[async_trait]
impl VersionControl for GitVersionControl {
    async fn latest_release_version(&self) -> Result<ReleaseVersion, VcsError> {
        self.fetch(&["--tags"]).await?;
        let tags = self
            .git(&["tag", "--list", self.settings.release_tag_pattern.as_str()])
            .await?;
        let latest = ReleaseVersion::latest_stable(tags.lines()).ok_or(VcsError::NoRelease)?;
        info!("Latest release tag: v{}", latest);
        Ok(latest)
    }

    async fn merge_base_commit(&self) -> Result<CommitId, VcsError> {
        self.fetch(&[self.target_branch.as_str()]).await?;
        let target = self.target_ref();
        let stdout = self.git(&["merge-base", "HEAD", target.as_str()]).await?;
        parse_commit(&stdout)
    }
}

fn parse_commit(stdout: &str) -> Result<CommitId, VcsError> {
    stdout
        .trim()
        .parse()
        .map_err(|_| VcsError::InvalidOutput(format!("not a commit: {:?}", stdout.trim())))
}
