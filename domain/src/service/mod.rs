//! Service topology of a run: endpoints and override specs.

pub mod endpoint;
pub mod spec;
