//! Service configuration from TOML (`[services]` section)

use super::ConfigValidationError;
use crate::compose::ComposeSettings;
use consistency_application::DEFAULT_IMAGE_REPOSITORY;
use consistency_domain::EndpointLayout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServicesConfig {
    /// Container CLI
    pub program: String,
    /// Compose project name
    pub project: String,
    /// Base compose file
    pub compose_file: Option<PathBuf>,
    /// Repository of baseline images (`<repository>:<tag>`)
    pub image_repository: String,
    /// Image of the locally built candidate
    pub local_image: String,
    /// Directory for generated override files
    pub state_dir: Option<PathBuf>,
    pub internal_port: u16,
    pub other_port_offset: u16,
    pub this_service: String,
    pub other_service: String,
}

impl Default for FileServicesConfig {
    fn default() -> Self {
        let compose = ComposeSettings::default();
        let layout = EndpointLayout::default();
        Self {
            program: compose.program,
            project: compose.project,
            compose_file: compose.compose_file,
            image_repository: DEFAULT_IMAGE_REPOSITORY.to_string(),
            local_image: compose.local_image,
            state_dir: compose.state_dir,
            internal_port: layout.internal_port,
            other_port_offset: layout.other_port_offset,
            this_service: layout.this_service,
            other_service: layout.other_service,
        }
    }
}

impl FileServicesConfig {
    pub fn layout(&self) -> EndpointLayout {
        EndpointLayout {
            this_service: self.this_service.clone(),
            other_service: self.other_service.clone(),
            internal_port: self.internal_port,
            other_port_offset: self.other_port_offset,
        }
    }

    pub fn compose_settings(&self) -> ComposeSettings {
        ComposeSettings {
            program: self.program.clone(),
            project: self.project.clone(),
            compose_file: self.compose_file.clone(),
            local_image: self.local_image.clone(),
            state_dir: self.state_dir.clone(),
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigValidationError> {
        let required = [
            ("services.program", &self.program),
            ("services.project", &self.project),
            ("services.image_repository", &self.image_repository),
            ("services.local_image", &self.local_image),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyValue(key));
            }
        }
        self.layout()
            .assign()
            .map(|_| ())
            .map_err(ConfigValidationError::InvalidLayout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_adapters() {
        let services = FileServicesConfig::default();
        assert_eq!(services.compose_settings(), ComposeSettings::default());
        assert_eq!(services.layout(), EndpointLayout::default());
        assert_eq!(services.image_repository, "materialize/materialized");
    }

    #[test]
    fn test_default_layout_assigns_expected_ports() {
        let pair = FileServicesConfig::default().layout().assign().unwrap();
        assert_eq!(pair.this.port_mapping(), "6875:6875");
        assert_eq!(pair.other.port_mapping(), "16875:6875");
    }

    #[test]
    fn test_validate_rejects_overflowing_offset() {
        let services = FileServicesConfig {
            internal_port: 60000,
            other_port_offset: 10000,
            ..Default::default()
        };
        assert!(matches!(
            services.validate(),
            Err(ConfigValidationError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_project() {
        let services = FileServicesConfig {
            project: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            services.validate(),
            Err(ConfigValidationError::EmptyValue("services.project"))
        ));
    }
}
