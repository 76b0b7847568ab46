//! Execution orchestrator: `docker pull` / `docker run` for each workflow mode.
//!
//! | Mode     | `COPYBARA_WORKFLOW` | Extra env              | Tool options                              |
//! |----------|---------------------|------------------------|-------------------------------------------|
//! | `init`   | `push`              | none                   | `--force --init-history --ignore-noop` …  |
//! | `pr`     | `pr`                | `COPYBARA_SOURCEREF`   | `--ignore-noop` …                         |
//! | other    | the mode name       | none                   | `--ignore-noop` …                         |
//!
//! Tool options reach the container through `COPYBARA_OPTIONS`, forwarded
//! from the host environment with a bare `-e COPYBARA_OPTIONS`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bara_core::{classify, DockerConfig, SourceRef, WorkflowMode};

use crate::error::RunnerError;
use crate::process::{ProcessCommand, ProcessRunner};
use crate::staging::HostPaths;

pub const DOCKER: &str = "docker";
pub const ENTRYPOINT: &str = "copybara";

pub const CONTAINER_SOURCE_ROOT: &str = "/usr/src/app";
pub const CONTAINER_CONFIG_PATH: &str = "/root/copy.bara.sky";
pub const CONTAINER_GIT_CONFIG_PATH: &str = "/root/.gitconfig";

pub const ENV_CONFIG: &str = "COPYBARA_CONFIG";
pub const ENV_WORKFLOW: &str = "COPYBARA_WORKFLOW";
pub const ENV_SOURCE_REF: &str = "COPYBARA_SOURCEREF";
pub const ENV_OPTIONS: &str = "COPYBARA_OPTIONS";

pub const FLAG_FORCE: &str = "--force";
pub const FLAG_INIT_HISTORY: &str = "--init-history";
pub const FLAG_IGNORE_NOOP: &str = "--ignore-noop";

const INIT_FLAGS: &[&str] = &[FLAG_FORCE, FLAG_INIT_HISTORY, FLAG_IGNORE_NOOP];
const RUN_FLAGS: &[&str] = &[FLAG_IGNORE_NOOP];

// ---------------------------------------------------------------------------
// Invocation model
// ---------------------------------------------------------------------------

/// A host path bind-mounted into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: &'static str,
}

impl Mount {
    fn arg(&self) -> String {
        format!("{}:{}", self.host.display(), self.container)
    }
}

/// Everything that goes into one `docker run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRun {
    pub image: String,
    pub mounts: Vec<Mount>,
    /// `-e KEY=VALUE` pairs, in argument order.
    pub env: Vec<(String, String)>,
    /// Tool options carried by `COPYBARA_OPTIONS`.
    pub options: Vec<String>,
}

impl ContainerRun {
    /// Describe the run for `mode`.
    pub fn for_mode(
        image: &DockerConfig,
        paths: &HostPaths,
        workdir: &Path,
        mode: &WorkflowMode,
        extra_options: &[String],
        source_ref: &SourceRef,
    ) -> Self {
        let (env, flags) = match mode {
            WorkflowMode::Init => (
                vec![(ENV_WORKFLOW, WorkflowMode::Push.to_string())],
                INIT_FLAGS,
            ),
            WorkflowMode::Pr => (
                vec![
                    (ENV_WORKFLOW, WorkflowMode::Pr.to_string()),
                    (ENV_SOURCE_REF, source_ref.to_string()),
                ],
                RUN_FLAGS,
            ),
            other => (vec![(ENV_WORKFLOW, other.to_string())], RUN_FLAGS),
        };

        let mut all_env = vec![(ENV_CONFIG.to_owned(), CONTAINER_CONFIG_PATH.to_owned())];
        all_env.extend(env.into_iter().map(|(k, v)| (k.to_owned(), v)));

        let options = flags
            .iter()
            .map(|f| (*f).to_owned())
            .chain(extra_options.iter().filter(|o| !o.is_empty()).cloned())
            .collect();

        ContainerRun {
            image: image.reference(),
            mounts: vec![
                Mount { host: workdir.to_path_buf(), container: CONTAINER_SOURCE_ROOT },
                Mount { host: paths.config_document.clone(), container: CONTAINER_CONFIG_PATH },
                Mount { host: paths.git_config.clone(), container: CONTAINER_GIT_CONFIG_PATH },
            ],
            env: all_env,
            options,
        }
    }

    /// Value of a `-e` variable set on the container.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Space-joined tool options, if any.
    pub fn options_value(&self) -> Option<String> {
        (!self.options.is_empty()).then(|| self.options.join(" "))
    }

    /// Lower to a `docker run` command.
    pub fn to_command(&self) -> ProcessCommand {
        let mut cmd = ProcessCommand::new(DOCKER).arg("run");
        for mount in &self.mounts {
            cmd = cmd.arg("-v").arg(mount.arg());
        }
        for (key, value) in &self.env {
            cmd = cmd.arg("-e").arg(format!("{key}={value}"));
        }
        if let Some(options) = self.options_value() {
            cmd = cmd.arg("-e").arg(ENV_OPTIONS).env(ENV_OPTIONS, options);
        }
        cmd.arg(self.image.clone()).arg(ENTRYPOINT)
    }
}

/// `docker pull name:tag`.
pub fn pull_command(image: &DockerConfig) -> ProcessCommand {
    ProcessCommand::new(DOCKER).arg("pull").arg(image.reference())
}

// ---------------------------------------------------------------------------
// Copybara
// ---------------------------------------------------------------------------

/// Drives the containerized tool for one job.
#[derive(Clone)]
pub struct Copybara {
    image: DockerConfig,
    paths: HostPaths,
    workdir: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl Copybara {
    pub fn new(
        image: DockerConfig,
        paths: HostPaths,
        workdir: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            image,
            paths,
            workdir: workdir.into(),
            runner,
        }
    }

    pub fn image(&self) -> &DockerConfig {
        &self.image
    }

    /// Pull the configured image; returns the raw `docker pull` status.
    pub async fn download(&self) -> Result<i32, RunnerError> {
        let cmd = pull_command(&self.image);
        tracing::info!("pulling {}", self.image.reference());
        self.runner.status(&cmd).await
    }

    /// Describe the run for `mode` without executing it.
    pub fn plan(
        &self,
        mode: &WorkflowMode,
        extra_options: &[String],
        source_ref: &SourceRef,
    ) -> ContainerRun {
        ContainerRun::for_mode(
            &self.image,
            &self.paths,
            &self.workdir,
            mode,
            extra_options,
            source_ref,
        )
    }

    /// Run the container for `mode` and classify its exit status.
    ///
    /// `docker` itself runs from the mounted workdir. Success and no-op
    /// statuses are returned; failures become [`RunnerError::Exit`].
    pub async fn run(
        &self,
        mode: &WorkflowMode,
        extra_options: &[String],
        source_ref: &SourceRef,
    ) -> Result<i32, RunnerError> {
        let plan = self.plan(mode, extra_options, source_ref);
        tracing::info!(
            "running {} workflow {}",
            plan.image,
            plan.env_value(ENV_WORKFLOW).unwrap_or_default()
        );
        let command = plan.to_command().current_dir(self.workdir.clone());
        let status = self.runner.status(&command).await?;
        tracing::info!("copybara exited with {status}");
        Ok(classify(status)?)
    }
}
