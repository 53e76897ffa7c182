//! Service lifecycle port.
//!
//! Destroys, overrides and starts the database services of a run. The
//! override call hands back a [`ServiceOverrideGuard`] that reverts the
//! topology exactly once, whichever way the run ends.

use async_trait::async_trait;
use consistency_domain::ServiceSpec;
use thiserror::Error;
use tracing::warn;

/// Errors from the service runtime.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Service runtime unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Io(e.to_string())
    }
}

type RestoreFn = Box<dyn FnOnce() -> Result<(), ServiceError> + Send>;

/// Scoped replacement of the service topology.
///
/// The prior topology is restored by [`release`](Self::release), or on drop
/// if the guard is dropped without being released (early return, error,
/// cancelled future). Restoration runs at most once.
pub struct ServiceOverrideGuard {
    services: Vec<String>,
    restore: Option<RestoreFn>,
}

impl ServiceOverrideGuard {
    pub fn new(
        services: Vec<String>,
        restore: impl FnOnce() -> Result<(), ServiceError> + Send + 'static,
    ) -> Self {
        Self {
            services,
            restore: Some(Box::new(restore)),
        }
    }

    /// Names of the overridden services.
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Whether the topology has already been restored.
    pub fn is_released(&self) -> bool {
        self.restore.is_none()
    }

    /// Restore the prior topology now and report the outcome.
    ///
    /// The restore runs on the blocking pool, off the runtime's workers. It
    /// completes even if the returned future is dropped once started.
    pub async fn release(mut self) -> Result<(), ServiceError> {
        match self.restore.take() {
            Some(restore) => tokio::task::spawn_blocking(restore)
                .await
                .map_err(|e| ServiceError::Io(format!("restore task failed: {}", e)))?,
            None => Ok(()),
        }
    }

    fn restore_once(&mut self) -> Result<(), ServiceError> {
        match self.restore.take() {
            Some(restore) => restore(),
            None => Ok(()),
        }
    }
}

impl Drop for ServiceOverrideGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore_once() {
            warn!(
                "Failed to restore services {}: {}",
                self.services.join(", "),
                e
            );
        }
    }
}

impl std::fmt::Debug for ServiceOverrideGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceOverrideGuard")
            .field("services", &self.services)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Port for managing the database services.
#[async_trait]
pub trait ServiceLifecycle: Send + Sync {
    /// Stop and remove every service of the environment.
    ///
    /// Must succeed when nothing is running.
    async fn destroy_all(&self, including_volumes: bool) -> Result<(), ServiceError>;

    /// Start one service and wait until it is up.
    async fn start(&self, service: &str) -> Result<(), ServiceError>;

    /// Replace the definitions of `specs` until the returned guard restores them.
    async fn override_services(
        &self,
        specs: &[ServiceSpec],
    ) -> Result<ServiceOverrideGuard, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counting_guard(count: &Arc<AtomicUsize>) -> ServiceOverrideGuard {
        let count = Arc::clone(count);
        ServiceOverrideGuard::new(vec!["mz_this".into(), "mz_other".into()], move || {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_release_restores_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let guard = counting_guard(&count);
        guard.release().await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_runs_off_the_runtime_thread() {
        let restored_on = Arc::new(Mutex::new(None));
        let recorded = Arc::clone(&restored_on);
        let guard = ServiceOverrideGuard::new(vec!["mz_this".into()], move || {
            *recorded.lock().unwrap() = Some(std::thread::current().id());
            Ok(())
        });

        // The default test runtime is single-threaded: a blocking restore
        // would run on this very thread.
        guard.release().await.unwrap();
        let restored_on = restored_on.lock().unwrap().unwrap();
        assert_ne!(restored_on, std::thread::current().id());
    }

    #[test]
    fn test_drop_restores_once() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let guard = counting_guard(&count);
            assert!(!guard.is_released());
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_restore_on_error_path() {
        fn failing_step(_guard: &ServiceOverrideGuard) -> Result<(), ServiceError> {
            Err(ServiceError::Unavailable("connection refused".into()))
        }

        let count = Arc::new(AtomicUsize::new(0));
        let result = async {
            let guard = counting_guard(&count);
            failing_step(&guard)?;
            guard.release().await
        }
        .await;

        assert!(result.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_restore_is_reported_by_release() {
        let guard = ServiceOverrideGuard::new(vec!["mz_other".into()], || {
            Err(ServiceError::Unavailable("daemon gone".into()))
        });
        assert!(matches!(
            guard.release().await,
            Err(ServiceError::Unavailable(_))
        ));
    }

    #[test]
    fn test_debug_shows_services() {
        let count = Arc::new(AtomicUsize::new(0));
        let guard = counting_guard(&count);
        let debug = format!("{:?}", guard);
        assert!(debug.contains("mz_this"));
        assert!(debug.contains("released: false"));
    }
}
