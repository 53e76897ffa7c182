//! Build tag of the "other" instance

use crate::version::commit::CommitId;
use crate::version::release::ReleaseVersion;
use serde::{Deserialize, Serialize};

/// Identifies the pullable artifact the "other" instance runs.
///
/// Computed once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum BuildTag {
    /// A published release, rendered `v<version>`
    Release(ReleaseVersion),
    /// A development build of a mainline commit, rendered `devel-<commit>`
    Devel(CommitId),
}

impl BuildTag {
    pub fn is_release(&self) -> bool {
        matches!(self, BuildTag::Release(_))
    }

    /// Full image reference for this tag in `repository`.
    pub fn image(&self, repository: &str) -> String {
        format!("{}:{}", repository, self)
    }
}

impl std::fmt::Display for BuildTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildTag::Release(version) => write!(f, "v{}", version),
            BuildTag::Devel(commit) => write!(f, "devel-{}", commit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_tag_format() {
        let tag = BuildTag::Release("1.4.0".parse().unwrap());
        assert_eq!(tag.to_string(), "v1.4.0");
        assert!(tag.is_release());
    }

    #[test]
    fn test_release_tag_has_single_prefix() {
        let tag = BuildTag::Release("v1.4.0".parse().unwrap());
        assert_eq!(tag.to_string(), "v1.4.0");
    }

    #[test]
    fn test_devel_tag_format() {
        let tag = BuildTag::Devel("abc123".parse().unwrap());
        assert_eq!(tag.to_string(), "devel-abc123");
        assert!(!tag.is_release());
    }

    #[test]
    fn test_image_reference() {
        let tag = BuildTag::Release(ReleaseVersion::new(0, 130, 0));
        assert_eq!(
            tag.image("materialize/materialized"),
            "materialize/materialized:v0.130.0"
        );
    }
}
