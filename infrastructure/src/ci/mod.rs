//! CI environment detection.

mod buildkite;

pub use buildkite::BuildkiteContext;
