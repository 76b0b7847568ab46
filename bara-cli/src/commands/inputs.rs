//! Job inputs shared by every subcommand.
//!
//! Each flag can also be supplied through the GitHub Actions `INPUT_<NAME>`
//! environment variable, so the binary runs unchanged as an action step.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bara_core::{
    job_file, Credentials, DockerConfig, JobConfig, RepoConfig, SourceRef, WorkflowConfig,
    WorkflowMode,
};
use bara_runner::HostPaths;

/// Inputs describing one mirroring job.
#[derive(Args, Debug, Default)]
pub struct JobArgs {
    /// YAML job file; replaces the repository/glob/rule flags below.
    /// Workflow, pull request, option, image and create-repo inputs that are
    /// set still override the file.
    #[arg(long, env = "BARA_JOB")]
    pub job: Option<PathBuf>,

    /// Source-of-truth repository (`owner/name`).
    #[arg(long, env = "INPUT_SOT_REPO", default_value = "")]
    pub sot_repo: String,

    #[arg(long, env = "INPUT_SOT_BRANCH", default_value = "main")]
    pub sot_branch: String,

    /// Destination repository (`owner/name`).
    #[arg(long, env = "INPUT_DESTINATION_REPO", default_value = "")]
    pub destination_repo: String,

    #[arg(long, env = "INPUT_DESTINATION_BRANCH", default_value = "main")]
    pub destination_branch: String,

    /// Commit author, `Name <email>`.
    #[arg(long, env = "INPUT_COMMITTER", default_value = "")]
    pub committer: String,

    /// Space-separated globs.
    #[arg(long, env = "INPUT_ORIGIN_INCLUDE", default_value = "**")]
    pub origin_include: String,

    #[arg(long, env = "INPUT_ORIGIN_EXCLUDE", default_value = "")]
    pub origin_exclude: String,

    #[arg(long, env = "INPUT_DESTINATION_INCLUDE", default_value = "**")]
    pub destination_include: String,

    #[arg(long, env = "INPUT_DESTINATION_EXCLUDE", default_value = "")]
    pub destination_exclude: String,

    /// Newline-separated `from||to||path` move rules.
    #[arg(long = "move", env = "INPUT_MOVE", default_value = "")]
    pub moves: String,

    /// Newline-separated `from||to||path` replace rules.
    #[arg(long = "replace", env = "INPUT_REPLACE", default_value = "")]
    pub replaces: String,

    /// Hand-written config document used instead of the synthesized one.
    #[arg(long, env = "INPUT_CUSTOM_CONFIG", default_value = "")]
    pub custom_config: String,

    /// Workflow mode: push, init, pr, or a custom workflow name [default: push].
    #[arg(long, env = "INPUT_WORKFLOW")]
    pub workflow: Option<String>,

    /// Space-separated options forwarded to copybara.
    #[arg(long, env = "INPUT_COPYBARA_OPTIONS")]
    pub copybara_options: Option<String>,

    /// Pull request number or ref for the `pr` workflow.
    #[arg(long, env = "INPUT_PR_NUMBER")]
    pub pr_number: Option<String>,

    /// Container image [default: olivr/copybara].
    #[arg(long, env = "INPUT_COPYBARA_IMAGE")]
    pub copybara_image: Option<String>,

    /// Container image tag [default: latest].
    #[arg(long, env = "INPUT_COPYBARA_IMAGE_TAG")]
    pub copybara_image_tag: Option<String>,

    /// `yes` creates the destination repository when it does not exist.
    #[arg(long, env = "INPUT_CREATE_REPO")]
    pub create_repo: Option<String>,

    /// Login assigned to the pull request.
    #[arg(long, env = "GITHUB_ACTOR", default_value = "")]
    pub actor: String,

    #[arg(long, env = "INPUT_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,

    #[arg(long, env = "INPUT_SSH_KEY", default_value = "", hide_env_values = true)]
    pub ssh_key: String,

    #[arg(long, env = "INPUT_SSH_KNOWN_HOSTS", default_value = "")]
    pub known_hosts: String,

    /// Directory to stage credentials and the config document in
    /// (defaults to the home directory).
    #[arg(long, env = "BARA_STAGE_DIR")]
    pub stage_dir: Option<PathBuf>,
}

impl JobArgs {
    /// Assemble the [`JobConfig`], loading `--job` when given.
    ///
    /// Per-run inputs override the job file when set to a non-empty value;
    /// credentials and the actor fill whatever the file leaves empty.
    pub fn to_job(&self) -> Result<JobConfig> {
        let mut job = match &self.job {
            Some(path) => job_file::load_at(path)
                .with_context(|| format!("cannot load job file '{}'", path.display()))?,
            None => self.job_from_flags(),
        };

        if let Some(workflow) = given(&self.workflow) {
            job.workflow = WorkflowMode::from(workflow);
        }
        if let Some(pr_number) = given(&self.pr_number) {
            job.pr_number = SourceRef::from(pr_number);
        }
        if let Some(options) = given(&self.copybara_options) {
            job.copybara_options = split_words(options);
        }
        if let Some(name) = given(&self.copybara_image) {
            job.image.name = name.to_owned();
        }
        if let Some(tag) = given(&self.copybara_image_tag) {
            job.image.tag = tag.to_owned();
        }
        if let Some(create) = given(&self.create_repo) {
            job.create_repo = is_yes(create);
        }

        let creds = &mut job.credentials;
        fill(&mut creds.access_token, &self.access_token);
        fill(&mut creds.ssh_key, &self.ssh_key);
        fill(&mut creds.known_hosts, &self.known_hosts);
        fill(&mut job.actor, &self.actor);
        Ok(job)
    }

    /// Everything but the per-run inputs, which [`JobArgs::to_job`] applies.
    fn job_from_flags(&self) -> JobConfig {
        JobConfig {
            sot: RepoConfig::new(&self.sot_repo, &self.sot_branch),
            destination: RepoConfig::new(&self.destination_repo, &self.destination_branch),
            committer: self.committer.clone(),
            push: WorkflowConfig {
                origin_include: split_words(&self.origin_include),
                origin_exclude: split_words(&self.origin_exclude),
                destination_include: split_words(&self.destination_include),
                destination_exclude: split_words(&self.destination_exclude),
                moves: split_lines(&self.moves),
                replaces: split_lines(&self.replaces),
            },
            workflow: WorkflowMode::default(),
            image: DockerConfig::default(),
            custom_config: (!self.custom_config.is_empty())
                .then(|| PathBuf::from(&self.custom_config)),
            copybara_options: vec![],
            pr_number: SourceRef::default(),
            create_repo: false,
            actor: String::new(),
            credentials: Credentials::default(),
        }
    }

    /// Where staged files go.
    pub fn host_paths(&self) -> Result<HostPaths> {
        match &self.stage_dir {
            Some(dir) => Ok(HostPaths::under(dir)),
            None => HostPaths::from_home().context("could not determine home directory"),
        }
    }
}

/// `Some` only for a value that was actually supplied; Actions passes unset
/// inputs as empty strings.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn is_yes(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "yes" | "true")
}

fn fill(target: &mut String, value: &str) {
    if target.is_empty() {
        *target = value.to_owned();
    }
}

/// Split a space-separated input; blanks are kept for the core to filter.
pub fn split_words(input: &str) -> Vec<String> {
    input.split(' ').map(str::to_owned).collect()
}

/// Split a newline-separated input (LF or CRLF).
pub fn split_lines(input: &str) -> Vec<String> {
    input
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_owned())
        .collect()
}
