//! Versions of the "other" instance
//!
//! - [`release::ReleaseVersion`]: published release versions
//! - [`commit::CommitId`]: merge-base commits
//! - [`build_tag::BuildTag`]: the image tag derived from either

pub mod build_tag;
pub mod commit;
pub mod release;
