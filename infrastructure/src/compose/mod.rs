//! Service lifecycle adapters.

mod docker_compose;
mod override_file;

pub use docker_compose::{ComposeSettings, DockerCompose};
