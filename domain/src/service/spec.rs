//! Service override definitions

use crate::service::endpoint::ServiceEndpoint;
use serde::{Deserialize, Serialize};

/// Replacement definition of one database service for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub endpoint: ServiceEndpoint,
    /// Image to pull; `None` runs the locally built candidate
    pub image: Option<String>,
    /// Runs must not inherit state from earlier runs
    pub use_default_volumes: bool,
}

impl ServiceSpec {
    /// The locally built candidate.
    pub fn local(endpoint: ServiceEndpoint) -> Self {
        Self {
            endpoint,
            image: None,
            use_default_volumes: false,
        }
    }

    /// A published image.
    pub fn from_image(endpoint: ServiceEndpoint, image: impl Into<String>) -> Self {
        Self {
            endpoint,
            image: Some(image.into()),
            use_default_volumes: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.endpoint.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_spec_has_no_image() {
        let spec = ServiceSpec::local(ServiceEndpoint::new("mz_this", 6875, 6875));
        assert_eq!(spec.name(), "mz_this");
        assert!(spec.image.is_none());
        assert!(!spec.use_default_volumes);
    }

    #[test]
    fn test_image_spec() {
        let spec = ServiceSpec::from_image(
            ServiceEndpoint::new("mz_other", 16875, 6875),
            "materialize/materialized:v1.4.0",
        );
        assert_eq!(spec.image.as_deref(), Some("materialize/materialized:v1.4.0"));
    }
}
