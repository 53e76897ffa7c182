//! Configuration file loading for version-consistency
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `VERSION_CONSISTENCY_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./version-consistency.toml` or `./.version-consistency.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/version-consistency/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileConfig, FileOutputConfig, FileServicesConfig};
pub use loader::ConfigLoader;
