//! External process seam.
//!
//! Invocations are plain [`ProcessCommand`] values executed by a
//! [`ProcessRunner`]. Production uses [`TokioProcessRunner`]; tests use
//! [`crate::fake::ScriptedRunner`], which records commands and replays exit
//! codes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::RunnerError;

/// Status reported when a process ends without an exit code (killed by signal).
pub const NO_EXIT_CODE: i32 = -1;

/// A program, its arguments, and extra environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Added to the inherited environment of the child.
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs a command to completion and reports its exit status.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn status(&self, command: &ProcessCommand) -> Result<i32, RunnerError>;
}

// ---------------------------------------------------------------------------
// Tokio runner
// ---------------------------------------------------------------------------

/// Spawns real processes; stdout/stderr are inherited so tool output lands
/// in the CI log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn status(&self, command: &ProcessCommand) -> Result<i32, RunnerError> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args).envs(&command.env);
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!("exec: {command}");
        let status = cmd.status().await.map_err(|source| RunnerError::Spawn {
            program: command.program.clone(),
            source,
        })?;
        Ok(status.code().unwrap_or(NO_EXIT_CODE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_args_and_env() {
        let cmd = ProcessCommand::new("docker")
            .arg("pull")
            .args(["a", "b"])
            .env("K", "V");
        assert_eq!(cmd.args, ["pull", "a", "b"]);
        assert_eq!(cmd.env.get("K").map(String::as_str), Some("V"));
        assert_eq!(cmd.to_string(), "docker pull a b");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tokio_runner_reports_exit_code() {
        let cmd = ProcessCommand::new("sh").args(["-c", "exit 3"]);
        assert_eq!(TokioProcessRunner.status(&cmd).await.unwrap(), 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tokio_runner_runs_in_working_dir() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let cmd = ProcessCommand::new("sh")
            .args(["-c", "touch marker"])
            .current_dir(dir.path());
        assert_eq!(TokioProcessRunner.status(&cmd).await.unwrap(), 0);
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn tokio_runner_reports_spawn_failure() {
        let cmd = ProcessCommand::new("bara-definitely-not-a-program");
        let err = TokioProcessRunner.status(&cmd).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }
}
