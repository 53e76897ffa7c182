//! Compose override documents.

use consistency_domain::ServiceSpec;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mount point of the data volume inside the database container.
const DATA_MOUNT: &str = "/mzdata";

#[derive(Debug, Serialize)]
struct OverrideDocument {
    services: BTreeMap<String, OverrideService>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    volumes: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
struct OverrideService {
    image: String,
    ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    volumes: Vec<String>,
}

/// Render `specs` as a compose file. Specs without an image run `local_image`.
pub(crate) fn render(specs: &[ServiceSpec], local_image: &str) -> Result<String, serde_yaml::Error> {
    let mut document = OverrideDocument {
        services: BTreeMap::new(),
        volumes: BTreeMap::new(),
    };

    for spec in specs {
        let mut volumes = Vec::new();
        if spec.use_default_volumes {
            let volume = format!("{}_data", spec.name());
            volumes.push(format!("{}:{}", volume, DATA_MOUNT));
            document.volumes.insert(volume, BTreeMap::new());
        }
        document.services.insert(
            spec.name().to_string(),
            OverrideService {
                image: spec.image.clone().unwrap_or_else(|| local_image.to_string()),
                ports: vec![spec.endpoint.port_mapping()],
                volumes,
            },
        );
    }

    serde_yaml::to_string(&document)
}
