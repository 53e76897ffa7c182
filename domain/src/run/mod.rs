//! A single consistency run: its configuration, state and outcome.

pub mod configuration;
pub mod state;
pub mod summary;
pub mod workload;
