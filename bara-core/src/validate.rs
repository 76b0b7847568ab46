//! Pre-flight checks run before any file is written or process spawned.
//!
//! Checks run in a fixed order and the first failure is returned.

use crate::error::ConfigError;
use crate::types::JobConfig;

/// Validate a job whose config document will be synthesized.
pub fn validate(job: &JobConfig) -> Result<(), ConfigError> {
    validate_common(job)?;
    if !job.push.has_origin_include() {
        return Err(ConfigError::MissingOriginInclude);
    }
    if job.sot.repo.is_empty() || job.destination.repo.is_empty() {
        return Err(ConfigError::MissingRepos);
    }
    validate_repo_creation(job)?;
    validate_rules(job)
}

/// Validate a job that brings its own config document.
///
/// File selection and repositories live in the custom document, so only
/// the committer and image are required, plus the destination repository
/// when it is to be created.
pub fn validate_custom(job: &JobConfig) -> Result<(), ConfigError> {
    validate_common(job)?;
    validate_repo_creation(job)
}

fn validate_common(job: &JobConfig) -> Result<(), ConfigError> {
    if job.committer.is_empty() {
        return Err(ConfigError::MissingCommitter);
    }
    if job.image.name.is_empty() {
        return Err(ConfigError::MissingImageName);
    }
    if job.image.tag.is_empty() {
        return Err(ConfigError::MissingImageTag);
    }
    Ok(())
}

/// Creating the destination needs its name and an API token.
fn validate_repo_creation(job: &JobConfig) -> Result<(), ConfigError> {
    if !job.create_repo {
        return Ok(());
    }
    if job.destination.repo.is_empty() {
        return Err(ConfigError::MissingRepos);
    }
    if job.credentials.access_token.is_empty() {
        return Err(ConfigError::MissingAccessToken);
    }
    Ok(())
}

fn validate_rules(job: &JobConfig) -> Result<(), ConfigError> {
    job.push
        .move_rules()
        .map_err(|source| ConfigError::InvalidRule { field: "move", source })?;
    job.push
        .replace_rules()
        .map_err(|source| ConfigError::InvalidRule { field: "replace", source })?;
    Ok(())
}
