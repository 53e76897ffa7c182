//! SQL connection port.
//!
//! Connections are opened against a service's *internal* port: the run
//! addresses instances over the service network, not the host mappings.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Could not connect to {service}:{port}: {message}")]
    Refused {
        service: String,
        port: u16,
        message: String,
    },

    #[error("Query failed on {service}: {message}")]
    Query { service: String, message: String },
}

/// A live connection to one database instance.
#[async_trait]
pub trait SqlConnection: Send + Sync {
    /// Service this connection belongs to.
    fn service(&self) -> &str;

    /// Host name or address the connection targets.
    fn host(&self) -> &str;

    fn port(&self) -> u16;

    /// Version string reported by the server.
    async fn server_version(&self) -> Result<String, ConnectionError>;
}

/// Port for opening connections.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn connect(
        &self,
        service: &str,
        port: u16,
    ) -> Result<Box<dyn SqlConnection>, ConnectionError>;
}
