//! Job pipeline: validate → synthesize → ensure destination → stage → pull → run.
//!
//! Steps run strictly in order; each external process is awaited before the
//! next step starts. Nothing is written or spawned when validation fails.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use bara_core::{validate, validate_custom, ExitFailure, JobConfig, SourceRef, WorkflowMode};
use bara_renderer::Synthesizer;

use crate::docker::Copybara;
use crate::error::{io_err, RunnerError};
use crate::github::{ensure_repo, RepoHost};
use crate::staging::HostStager;

/// Where the staged config document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum ConfigSource {
    Synthesized,
    Custom(PathBuf),
}

/// Outcome of a successful job.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub workflow: String,
    pub image: String,
    pub config: ConfigSource,
    /// The destination repository was created by this run.
    pub repo_created: bool,
    /// Classified tool status (`0` or a no-op warning code).
    pub exit_code: i32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Validate `job` and produce the config document to stage.
///
/// A `custom_config` file is used verbatim; otherwise the document is
/// synthesized from the job.
pub fn prepare_config(
    job: &JobConfig,
    synthesizer: &Synthesizer,
) -> Result<(String, ConfigSource), RunnerError> {
    match &job.custom_config {
        Some(path) => {
            validate_custom(job)?;
            let document = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
            Ok((document, ConfigSource::Custom(path.clone())))
        }
        None => {
            validate(job)?;
            Ok((synthesizer.render(job)?, ConfigSource::Synthesized))
        }
    }
}

/// Write credentials and the config document.
pub fn stage(job: &JobConfig, document: &str, stager: &HostStager) -> Result<(), RunnerError> {
    let creds = &job.credentials;
    stager.save_git_config(&job.committer, &creds.access_token)?;
    if !creds.ssh_key.is_empty() {
        stager.save_ssh_key(&creds.ssh_key)?;
    }
    stager.save_known_hosts(&creds.known_hosts)?;
    stager.save_config_document(document)?;
    tracing::info!(
        "staged config document at {}",
        stager.paths().config_document.display()
    );
    Ok(())
}

/// Source reference for `mode`; only the `pr` workflow carries one.
fn source_ref_for(job: &JobConfig) -> SourceRef {
    match job.workflow {
        WorkflowMode::Pr => job.pr_number.clone(),
        _ => SourceRef::default(),
    }
}

/// Run the whole job.
///
/// `repos` is only consulted when the job asks for its destination to be
/// created. A failed image pull surfaces as an unknown failure; no step is
/// retried.
pub async fn run_job(
    job: &JobConfig,
    synthesizer: &Synthesizer,
    stager: &HostStager,
    copybara: &Copybara,
    repos: &dyn RepoHost,
) -> Result<JobReport, RunnerError> {
    let started_at = Utc::now();
    let (document, config) = prepare_config(job, synthesizer)?;
    let repo_created = if job.create_repo {
        ensure_repo(repos, &job.destination.repo).await?
    } else {
        false
    };
    stage(job, &document, stager)?;

    let pulled = copybara.download().await?;
    if pulled != 0 {
        tracing::error!("docker pull exited with {pulled}");
        return Err(ExitFailure::Unknown(pulled).into());
    }

    let exit_code = copybara
        .run(&job.workflow, &job.extra_options(), &source_ref_for(job))
        .await?;

    Ok(JobReport {
        workflow: job.workflow.to_string(),
        image: copybara.image().reference(),
        config,
        repo_created,
        exit_code,
        started_at,
        finished_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bara_core::{RepoConfig, WorkflowConfig};

    fn job() -> JobConfig {
        let mut job = JobConfig::new(
            RepoConfig::new("acme/internal", "main"),
            RepoConfig::new("acme/public", "main"),
            "Bot <bot@acme.dev>",
        );
        job.push = WorkflowConfig {
            origin_include: vec!["**".to_string()],
            ..Default::default()
        };
        job.pr_number = SourceRef::from(7u64);
        job
    }

    #[test]
    fn source_ref_only_for_pr() {
        let mut j = job();
        assert!(source_ref_for(&j).is_empty());
        j.workflow = WorkflowMode::Pr;
        assert_eq!(source_ref_for(&j).to_string(), "7");
    }

    #[test]
    fn prepare_rejects_invalid_job() {
        let mut j = job();
        j.committer.clear();
        let err = prepare_config(&j, &Synthesizer::new().unwrap()).unwrap_err();
        assert!(matches!(err, RunnerError::Config(_)));
        assert_eq!(err.exit_code(), bara_core::exit::CONFIG_FAILURE);
    }

    #[test]
    fn missing_custom_config_is_io_error() {
        let mut j = job();
        j.custom_config = Some(PathBuf::from("/nonexistent/copy.bara.sky"));
        let err = prepare_config(&j, &Synthesizer::new().unwrap()).unwrap_err();
        assert!(matches!(err, RunnerError::Io { .. }));
    }
}
