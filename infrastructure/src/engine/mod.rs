//! Comparison engine adapters.

mod external;

pub use external::{EngineSettings, ExternalComparisonEngine};
