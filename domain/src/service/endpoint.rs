//! Network endpoints of the two instances

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Port the database listens on inside its container.
pub const DEFAULT_INTERNAL_PORT: u16 = 6875;

/// Host port offset applied to the "other" instance.
pub const DEFAULT_OTHER_PORT_OFFSET: u16 = 10000;

/// Service name of the locally built candidate.
pub const DEFAULT_THIS_SERVICE: &str = "mz_this";

/// Service name of the baseline instance.
pub const DEFAULT_OTHER_SERVICE: &str = "mz_other";

/// How to reach one running instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub service: String,
    /// Port published on the host network
    pub host_port: u16,
    /// Port inside the service network; connections use this one
    pub internal_port: u16,
}

impl ServiceEndpoint {
    pub fn new(service: impl Into<String>, host_port: u16, internal_port: u16) -> Self {
        Self {
            service: service.into(),
            host_port,
            internal_port,
        }
    }

    /// Compose-style port mapping, `host:internal`.
    pub fn port_mapping(&self) -> String {
        format!("{}:{}", self.host_port, self.internal_port)
    }
}

impl std::fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.service, self.port_mapping())
    }
}

/// The endpoints of one run. Host ports are guaranteed distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPair {
    pub this: ServiceEndpoint,
    pub other: ServiceEndpoint,
}

/// Inputs for assigning [`EndpointPair`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointLayout {
    pub this_service: String,
    pub other_service: String,
    pub internal_port: u16,
    pub other_port_offset: u16,
}

impl Default for EndpointLayout {
    fn default() -> Self {
        Self {
            this_service: DEFAULT_THIS_SERVICE.to_string(),
            other_service: DEFAULT_OTHER_SERVICE.to_string(),
            internal_port: DEFAULT_INTERNAL_PORT,
            other_port_offset: DEFAULT_OTHER_PORT_OFFSET,
        }
    }
}

impl EndpointLayout {
    /// Assign both endpoints.
    ///
    /// "this" publishes the internal port unchanged so it behaves like a
    /// default-configured instance; "other" is shifted by the offset.
    pub fn assign(&self) -> Result<EndpointPair, DomainError> {
        if self.internal_port == 0 {
            return Err(DomainError::InvalidPorts("internal port cannot be 0".into()));
        }
        if self.other_port_offset == 0 {
            return Err(DomainError::InvalidPorts(
                "other port offset cannot be 0 (host ports would collide)".into(),
            ));
        }
        if self.this_service.is_empty() || self.other_service.is_empty() {
            return Err(DomainError::InvalidPorts("service names cannot be empty".into()));
        }
        if self.this_service == self.other_service {
            return Err(DomainError::InvalidPorts(format!(
                "both instances are named {}",
                self.this_service
            )));
        }

        let other_host_port = self
            .internal_port
            .checked_add(self.other_port_offset)
            .ok_or_else(|| {
                DomainError::InvalidPorts(format!(
                    "{} + {} exceeds the maximum port",
                    self.internal_port, self.other_port_offset
                ))
            })?;

        Ok(EndpointPair {
            this: ServiceEndpoint::new(&self.this_service, self.internal_port, self.internal_port),
            other: ServiceEndpoint::new(&self.other_service, other_host_port, self.internal_port),
        })
    }
}
