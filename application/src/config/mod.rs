//! Application-level configuration.
//!
//! - [`RunParams`]: image repository and endpoint layout of a run

pub mod run_params;

pub use run_params::{DEFAULT_IMAGE_REPOSITORY, RunParams};
