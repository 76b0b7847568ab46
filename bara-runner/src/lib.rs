//! # bara-runner
//!
//! Host staging and container orchestration.
//!
//! Call [`run_job`] to validate, synthesize, stage and execute a single
//! [`bara_core::JobConfig`], or drive [`Copybara`] directly for one step.
//! [`fake`] holds in-memory runners for testing code built on this crate.

pub mod diff;
pub mod docker;
pub mod error;
pub mod fake;
pub mod github;
pub mod pipeline;
pub mod process;
pub mod staging;

pub use diff::diff_staged;
pub use docker::{ContainerRun, Copybara};
pub use error::RunnerError;
pub use fake::{FakeRepoHost, ScriptedRunner};
pub use github::{ensure_repo, GitHubClient, RepoHost};
pub use pipeline::{prepare_config, run_job, ConfigSource, JobReport};
pub use process::{ProcessCommand, ProcessRunner, TokioProcessRunner};
pub use staging::{HostPaths, HostStager};
