//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod resolve_other_tag;
pub mod run_version_consistency;
