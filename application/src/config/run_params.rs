//! Run parameters: service settings resolved from configuration.
//!
//! [`RunParams`] carries the parts of a run that come from configuration
//! files rather than the command line: where baseline images live and how
//! the two instances are laid out on the network.

use consistency_domain::EndpointLayout;
use serde::{Deserialize, Serialize};

/// Default image repository of the "other" instance.
pub const DEFAULT_IMAGE_REPOSITORY: &str = "materialize/materialized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    /// Repository the baseline image is pulled from.
    pub image_repository: String,
    /// Service names and ports of both instances.
    pub layout: EndpointLayout,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            image_repository: DEFAULT_IMAGE_REPOSITORY.to_string(),
            layout: EndpointLayout::default(),
        }
    }
}

impl RunParams {
    // ==================== Builder Methods ====================

    pub fn with_image_repository(mut self, repository: impl Into<String>) -> Self {
        self.image_repository = repository.into();
        self
    }

    pub fn with_layout(mut self, layout: EndpointLayout) -> Self {
        self.layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = RunParams::default();
        assert_eq!(params.image_repository, "materialize/materialized");
        assert_eq!(params.layout.internal_port, 6875);
        assert_eq!(params.layout.other_port_offset, 10000);
    }

    #[test]
    fn test_builders() {
        let layout = EndpointLayout {
            other_port_offset: 20000,
            ..Default::default()
        };
        let params = RunParams::default()
            .with_image_repository("registry.local/db")
            .with_layout(layout.clone());
        assert_eq!(params.image_repository, "registry.local/db");
        assert_eq!(params.layout, layout);
    }
}
