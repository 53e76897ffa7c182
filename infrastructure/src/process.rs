//! Shared helpers for running external commands.

use std::path::Path;
use std::process::{Command, ExitStatus};

/// Captured result of a finished command.
pub(crate) struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Build a blocking command. Used directly where async is unavailable (drop
/// handlers) and converted into a tokio command everywhere else.
pub(crate) fn command(program: &str, args: &[String], working_dir: Option<&Path>) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }
    cmd
}

/// Run to completion, capturing stdout and stderr.
pub(crate) async fn output(
    program: &str,
    args: &[String],
    working_dir: Option<&Path>,
) -> std::io::Result<CommandOutput> {
    let output = tokio::process::Command::from(command(program, args, working_dir))
        .kill_on_drop(true)
        .output()
        .await?;
    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Human-readable command line for logs and errors.
pub(crate) fn render(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
