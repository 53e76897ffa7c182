//! Docker Compose service lifecycle.
//!
//! Every command runs as `docker compose --project-name <project>` with the
//! base compose file (if any) followed by the active override files. An
//! override is a generated compose file layered on top until its guard
//! restores the previous topology.

use super::override_file;
use crate::process;
use async_trait::async_trait;
use consistency_application::ports::service_lifecycle::{
    ServiceError, ServiceLifecycle, ServiceOverrideGuard,
};
use consistency_domain::ServiceSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Docker Compose settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeSettings {
    /// Container CLI, invoked as `<program> compose ...`
    pub program: String,
    /// Compose project name; isolates this run's containers and volumes
    pub project: String,
    /// Base compose file, if the services are defined in one
    pub compose_file: Option<PathBuf>,
    /// Image of the locally built candidate
    pub local_image: String,
    /// Directory for generated override files (defaults to the temp dir)
    pub state_dir: Option<PathBuf>,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            project: "version-consistency".to_string(),
            compose_file: None,
            local_image: "materialize/materialized:local".to_string(),
            state_dir: None,
        }
    }
}

impl ComposeSettings {
    fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("version-consistency"))
    }

    /// Arguments shared by every compose invocation.
    fn base_args(&self, overrides: &[PathBuf]) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "--project-name".to_string(),
            self.project.clone(),
        ];
        for file in self.compose_file.iter().chain(overrides) {
            args.push("--file".to_string());
            args.push(file.display().to_string());
        }
        args
    }
}

/// [`ServiceLifecycle`] backed by `docker compose`.
pub struct DockerCompose {
    settings: Arc<ComposeSettings>,
    overrides: Arc<Mutex<Vec<PathBuf>>>,
    override_counter: AtomicUsize,
}

impl DockerCompose {
    /// Create an adapter, checking that the container CLI is installed.
    pub fn new(settings: ComposeSettings) -> Result<Self, ServiceError> {
        if which::which(&settings.program).is_err() {
            return Err(ServiceError::Unavailable(format!(
                "{} not found in PATH",
                settings.program
            )));
        }
        Ok(Self {
            settings: Arc::new(settings),
            overrides: Arc::new(Mutex::new(Vec::new())),
            override_counter: AtomicUsize::new(0),
        })
    }

    /// Override files currently layered on top of the base file.
    pub fn active_overrides(&self) -> Vec<PathBuf> {
        lock(&self.overrides).clone()
    }

    async fn compose(&self, args: &[&str]) -> Result<(), ServiceError> {
        let mut full = self.settings.base_args(&self.active_overrides());
        full.extend(args.iter().map(|a| a.to_string()));
        let rendered = process::render(&self.settings.program, &full);
        debug!("Running {}", rendered);

        let output = process::output(&self.settings.program, &full, None).await?;
        if !output.status.success() {
            return Err(ServiceError::CommandFailed {
                command: rendered,
                status: output.status.to_string(),
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}

fn lock(overrides: &Mutex<Vec<PathBuf>>) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
    // A poisoned stack is still a valid list of files
    overrides.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Remove the overridden services, then drop the override file from the stack.
fn restore(
    settings: &ComposeSettings,
    overrides: &Mutex<Vec<PathBuf>>,
    file: &Path,
    services: &[String],
) -> Result<(), ServiceError> {
    let active = lock(overrides).clone();
    let mut args = settings.base_args(&active);
    args.extend(["rm", "--force", "--stop", "--volumes"].map(String::from));
    args.extend(services.iter().cloned());
    let rendered = process::render(&settings.program, &args);
    debug!("Running {}", rendered);

    let result = process::command(&settings.program, &args, None).output();

    lock(overrides).retain(|active| active != file);
    if let Err(e) = std::fs::remove_file(file) {
        debug!("Could not remove {}: {}", file.display(), e);
    }

    let output = result?;
    if !output.status.success() {
        return Err(ServiceError::CommandFailed {
            command: rendered,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    info!("Restored services {}", services.join(", "));
    Ok(())
}

#[async_trait]
impl ServiceLifecycle for DockerCompose {
    async fn destroy_all(&self, including_volumes: bool) -> Result<(), ServiceError> {
        let mut args = vec!["down", "--remove-orphans"];
        if including_volumes {
            args.push("--volumes");
        }
        self.compose(&args).await
    }

    async fn start(&self, service: &str) -> Result<(), ServiceError> {
        self.compose(&["up", "--detach", "--wait", service]).await
    }

    async fn override_services(
        &self,
        specs: &[ServiceSpec],
    ) -> Result<ServiceOverrideGuard, ServiceError> {
        let yaml = override_file::render(specs, &self.settings.local_image)
            .map_err(|e| ServiceError::Io(format!("failed to render override: {}", e)))?;

        let dir = self.settings.state_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let n = self.override_counter.fetch_add(1, Ordering::SeqCst);
        let file = dir.join(format!(
            "{}-{}-override-{}.yml",
            self.settings.project,
            std::process::id(),
            n
        ));
        tokio::fs::write(&file, yaml).await?;
        lock(&self.overrides).push(file.clone());

        let services: Vec<String> = specs.iter().map(|s| s.name().to_string()).collect();
        info!(
            "Overriding services {} with {}",
            services.join(", "),
            file.display()
        );

        let settings = Arc::clone(&self.settings);
        let overrides = Arc::clone(&self.overrides);
        let restored = services.clone();
        Ok(ServiceOverrideGuard::new(services, move || {
            restore(&settings, &overrides, &file, &restored)
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use consistency_domain::ServiceEndpoint;

    fn settings(program: &str, dir: &Path) -> ComposeSettings {
        ComposeSettings {
            program: program.to_string(),
            state_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    fn specs() -> Vec<ServiceSpec> {
        vec![
            ServiceSpec::local(ServiceEndpoint::new("mz_this", 6875, 6875)),
            ServiceSpec::from_image(ServiceEndpoint::new("mz_other", 16875, 6875), "db:v1.4.0"),
        ]
    }

    #[test]
    fn test_base_args_layer_files_in_order() {
        let settings = ComposeSettings {
            compose_file: Some(PathBuf::from("base.yml")),
            ..Default::default()
        };
        let args = settings.base_args(&[PathBuf::from("o1.yml"), PathBuf::from("o2.yml")]);
        assert_eq!(
            args,
            vec![
                "compose",
                "--project-name",
                "version-consistency",
                "--file",
                "base.yml",
                "--file",
                "o1.yml",
                "--file",
                "o2.yml"
            ]
        );
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = DockerCompose::new(settings("no-such-container-cli", dir.path()));
        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_destroy_all_on_empty_environment() {
        let dir = tempfile::tempdir().unwrap();
        let compose = DockerCompose::new(settings("true", dir.path())).unwrap();
        compose.destroy_all(true).await.unwrap();
        compose.destroy_all(true).await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_command_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let compose = DockerCompose::new(settings("false", dir.path())).unwrap();
        let err = compose.start("mz_this").await.unwrap_err();
        match err {
            ServiceError::CommandFailed { command, .. } => {
                assert!(command.ends_with("up --detach --wait mz_this"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_override_is_layered_until_released() {
        let dir = tempfile::tempdir().unwrap();
        let compose = DockerCompose::new(settings("true", dir.path())).unwrap();

        let guard = compose.override_services(&specs()).await.unwrap();
        let active = compose.active_overrides();
        assert_eq!(active.len(), 1);
        let content = std::fs::read_to_string(&active[0]).unwrap();
        assert!(content.contains("db:v1.4.0"));
        assert!(content.contains("16875:6875"));

        guard.release().await.unwrap();
        assert!(compose.active_overrides().is_empty());
        assert!(!active[0].exists());
    }

    #[tokio::test]
    async fn test_dropped_guard_restores() {
        let dir = tempfile::tempdir().unwrap();
        let compose = DockerCompose::new(settings("true", dir.path())).unwrap();
        {
            let _guard = compose.override_services(&specs()).await.unwrap();
            assert_eq!(compose.active_overrides().len(), 1);
        }
        assert!(compose.active_overrides().is_empty());
    }
}
