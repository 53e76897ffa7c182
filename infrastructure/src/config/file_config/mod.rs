//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Sections owned by a single adapter reuse that adapter's settings type.

mod output;
mod services;

pub use output::FileOutputConfig;
pub use services::FileServicesConfig;

use crate::engine::EngineSettings;
use crate::postgres::PgSettings;
use crate::vcs::GitSettings;
use consistency_application::RunParams;
use consistency_domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("invalid service layout: {0}")]
    InvalidLayout(#[source] DomainError),

    #[error("connection.connect_timeout_secs cannot be 0")]
    InvalidTimeout,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Service runtime and endpoint layout
    pub services: FileServicesConfig,
    /// Baseline lookup
    pub vcs: GitSettings,
    /// SQL connections
    pub connection: PgSettings,
    /// Comparison engine program
    pub engine: EngineSettings,
    /// Terminal output
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration before any work starts
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.services.validate()?;

        let required = [
            ("vcs.mainline_branch", &self.vcs.mainline_branch),
            ("vcs.release_tag_pattern", &self.vcs.release_tag_pattern),
            ("connection.user", &self.connection.user),
            ("connection.database", &self.connection.database),
            ("engine.program", &self.engine.program),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyValue(key));
            }
        }

        if self.connection.connect_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(())
    }

    /// Parameters for the run use case
    pub fn run_params(&self) -> RunParams {
        RunParams::default()
            .with_image_repository(self.services.image_repository.clone())
            .with_layout(self.services.layout())
    }
}
