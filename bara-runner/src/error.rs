//! Error types for bara-runner.

use std::path::PathBuf;

use thiserror::Error;

use bara_core::exit::{CONFIG_FAILURE, UNHANDLED_FAILURE};
use bara_core::{ConfigError, ExitFailure};
use bara_renderer::RenderError;

/// All errors that can arise while staging and running a job.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The job was rejected before anything was written or spawned.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error from the config synthesizer.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The tool exited with a status that fails the job.
    #[error(transparent)]
    Exit(#[from] ExitFailure),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external process could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A GitHub API call failed or was refused.
    #[error("GitHub API {action} failed: {reason}")]
    GitHub { action: String, reason: String },

    /// A blocking task did not complete.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

impl RunnerError {
    /// Process exit code the caller should report for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Config(_) => CONFIG_FAILURE,
            RunnerError::Exit(failure) => failure.code(),
            _ => UNHANDLED_FAILURE,
        }
    }
}

/// Convenience constructor for [`RunnerError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RunnerError {
    RunnerError::Io {
        path: path.into(),
        source,
    }
}
