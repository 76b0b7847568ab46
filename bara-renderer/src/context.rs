//! Template context: serializable rendering payload built from [`JobConfig`].

use serde::{Deserialize, Serialize};

use bara_core::JobConfig;

use crate::builder::{escape, glob_list_literal, TransformationClause};
use crate::error::RenderError;

/// Flat rendering payload for `copy.bara.sky.tera`.
///
/// String fields are already escaped; glob fields are complete list bodies
/// and `transformations` are complete `core.*` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigContext {
    pub sot_repo: String,
    pub sot_branch: String,
    pub destination_repo: String,
    pub destination_branch: String,
    pub committer: String,
    pub origin_files_include: String,
    pub origin_files_exclude: String,
    pub destination_files_include: String,
    pub destination_files_exclude: String,
    pub transformations: Vec<String>,
    pub assignee: String,
}

impl ConfigContext {
    /// Build a [`ConfigContext`] from a validated job and its clauses.
    pub fn from_job(job: &JobConfig, transformations: &[TransformationClause]) -> Self {
        let push = &job.push;
        ConfigContext {
            sot_repo: escape(&job.sot.url()),
            sot_branch: escape(&job.sot.branch),
            destination_repo: escape(&job.destination.url()),
            destination_branch: escape(&job.destination.branch),
            committer: escape(&job.committer),
            origin_files_include: glob_list_literal(&push.origin_include),
            origin_files_exclude: glob_list_literal(&push.origin_exclude),
            destination_files_include: glob_list_literal(&push.destination_include),
            destination_files_exclude: glob_list_literal(&push.destination_exclude),
            transformations: transformations.iter().map(ToString::to_string).collect(),
            assignee: escape(&job.actor),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bara_core::{RepoConfig, WorkflowConfig};

    fn make_job() -> JobConfig {
        let mut job = JobConfig::new(
            RepoConfig::new("acme/internal", "main"),
            RepoConfig::new("acme/public", "release"),
            "Bot <bot@acme.dev>",
        );
        job.push = WorkflowConfig {
            origin_include: vec!["src/**".to_string(), "".to_string()],
            ..Default::default()
        };
        job.actor = "octocat".to_string();
        job
    }

    #[test]
    fn context_fields_populated() {
        let ctx = ConfigContext::from_job(&make_job(), &[]);
        assert_eq!(ctx.sot_repo, "https://github.com/acme/internal.git");
        assert_eq!(ctx.destination_branch, "release");
        assert_eq!(ctx.origin_files_include, "\"src/**\"");
        assert_eq!(ctx.origin_files_exclude, "");
        assert_eq!(ctx.assignee, "octocat");
        assert!(ctx.transformations.is_empty());
    }

    #[test]
    fn to_tera_context_succeeds() {
        let ctx = ConfigContext::from_job(&make_job(), &[]);
        let tera_ctx = ctx.to_tera_context().expect("context conversion");
        let _ = tera_ctx;
    }
}
