//! [`ConnectionProvider`] over tokio-postgres.
//!
//! Instances are addressed by service name on the service network unless a
//! fixed host is configured.

use async_trait::async_trait;
use consistency_application::ports::connection::{
    ConnectionError, ConnectionProvider, SqlConnection,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};
use tracing::{debug, warn};

/// Connection settings shared by both instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgSettings {
    pub user: String,
    pub database: String,
    /// Fixed host for every service; the service name is used when unset
    pub host: Option<String>,
    pub connect_timeout_secs: u64,
}

impl Default for PgSettings {
    fn default() -> Self {
        Self {
            user: "materialize".to_string(),
            database: "materialize".to_string(),
            host: None,
            connect_timeout_secs: 30,
        }
    }
}

pub struct PgConnectionProvider {
    settings: PgSettings,
}

impl PgConnectionProvider {
    pub fn new(settings: PgSettings) -> Self {
        Self { settings }
    }

    fn host_for<'a>(&'a self, service: &'a str) -> &'a str {
        self.settings.host.as_deref().unwrap_or(service)
    }
}

#[async_trait]
impl ConnectionProvider for PgConnectionProvider {
    async fn connect(
        &self,
        service: &str,
        port: u16,
    ) -> Result<Box<dyn SqlConnection>, ConnectionError> {
        let host = self.host_for(service).to_string();
        debug!("Connecting to {} at {}:{}", service, host, port);

        let mut config = tokio_postgres::Config::new();
        config
            .host(&host)
            .port(port)
            .user(&self.settings.user)
            .dbname(&self.settings.database)
            .application_name("version-consistency")
            .connect_timeout(Duration::from_secs(self.settings.connect_timeout_secs));

        let (client, connection) =
            config
                .connect(NoTls)
                .await
                .map_err(|e| ConnectionError::Refused {
                    service: service.to_string(),
                    port,
                    message: e.to_string(),
                })?;

        let task_service = service.to_string();
        let task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("Connection to {} closed: {}", task_service, e);
            }
        });

        Ok(Box::new(PgConnection {
            service: service.to_string(),
            host,
            port,
            client,
            task,
        }))
    }
}

/// An open connection. Dropping it closes the socket.
pub struct PgConnection {
    service: String,
    host: String,
    port: u16,
    client: Client,
    task: JoinHandle<()>,
}

impl PgConnection {
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Drop for PgConnection {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[async_trait]
impl SqlConnection for PgConnection {
    fn service(&self) -> &str {
        &self.service
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    async fn server_version(&self) -> Result<String, ConnectionError> {
        let query_error = |message: String| ConnectionError::Query {
            service: self.service.clone(),
            message,
        };

        let messages = self
            .client
            .simple_query("SELECT version()")
            .await
            .map_err(|e| query_error(e.to_string()))?;

        messages
            .iter()
            .find_map(|message| match message {
                SimpleQueryMessage::Row(row) => row.get(0).map(str::to_string),
                _ => None,
            })
            .ok_or_else(|| query_error("version() returned no rows".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_is_default_host() {
        let provider = PgConnectionProvider::new(PgSettings::default());
        assert_eq!(provider.host_for("mz_this"), "mz_this");
    }

    #[test]
    fn test_fixed_host_overrides_service_name() {
        let provider = PgConnectionProvider::new(PgSettings {
            host: Some("127.0.0.1".to_string()),
            ..Default::default()
        });
        assert_eq!(provider.host_for("mz_other"), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_refused_connection_names_service_and_port() {
        // Bind then drop a listener to get a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let provider = PgConnectionProvider::new(PgSettings {
            host: Some("127.0.0.1".to_string()),
            connect_timeout_secs: 2,
            ..Default::default()
        });

        let err = match provider.connect("mz_this", port).await {
            Ok(_) => panic!("connected to a closed port"),
            Err(e) => e,
        };
        match err {
            ConnectionError::Refused {
                service, port: p, ..
            } => {
                assert_eq!(service, "mz_this");
                assert_eq!(p, port);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
