//! Tera rendering engine: [`Synthesizer`] for `copy.bara.sky`.
//!
//! The document template is embedded at compile time. A directory holding
//! a `copy.bara.sky.tera` file can be supplied to override it.

use std::path::{Path, PathBuf};

use tera::Tera;

use bara_core::JobConfig;

use crate::builder::{build_transformations, TransformationClause};
use crate::context::ConfigContext;
use crate::error::RenderError;

/// Name of the document template, both embedded and in override dirs.
pub const CONFIG_TEMPLATE: &str = "copy.bara.sky.tera";

const EMBEDDED_TEMPLATE: &str = include_str!("templates/copy.bara.sky.tera");

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn load_override(dir: &Path) -> Result<Option<String>, RenderError> {
    let path = dir.join(CONFIG_TEMPLATE);
    if !path.is_file() {
        return Ok(None);
    }
    std::fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| io_err(&path, e))
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let template = match user_template_dir {
        Some(dir) => load_override(dir)?.unwrap_or_else(|| EMBEDDED_TEMPLATE.to_string()),
        None => EMBEDDED_TEMPLATE.to_string(),
    };

    let mut tera = Tera::default();
    tera.add_raw_template(CONFIG_TEMPLATE, &template)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Renders the workflow config document from a validated [`JobConfig`].
///
/// Rendering is deterministic: the same job always yields byte-identical
/// output. Create once with [`Synthesizer::new`] and reuse.
pub struct Synthesizer {
    tera: Tera,
}

impl Synthesizer {
    /// Construct a [`Synthesizer`] with the embedded template.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template_dir(None)
    }

    /// Construct a [`Synthesizer`], preferring `copy.bara.sky.tera` from
    /// `user_template_dir` when present.
    pub fn with_template_dir(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Synthesizer { tera: build_tera(user_template_dir)? })
    }

    /// Build transformations for `job` and render the document.
    ///
    /// The caller is expected to have run [`bara_core::validate`] first.
    pub fn render(&self, job: &JobConfig) -> Result<String, RenderError> {
        let clauses = build_transformations(&job.push.moves, &job.push.replaces, &job.workflow)?;
        self.render_with_clauses(job, &clauses)
    }

    /// Render the document with caller-provided clauses.
    pub fn render_with_clauses(
        &self,
        job: &JobConfig,
        clauses: &[TransformationClause],
    ) -> Result<String, RenderError> {
        let ctx = ConfigContext::from_job(job, clauses);
        self.render_context(&ctx)
    }

    /// Render a prepared [`ConfigContext`].
    pub fn render_context(&self, ctx: &ConfigContext) -> Result<String, RenderError> {
        let rendered = self.tera.render(CONFIG_TEMPLATE, &ctx.to_tera_context()?)?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bara_core::{RepoConfig, WorkflowConfig};
    use tempfile::TempDir;

    fn make_job() -> JobConfig {
        let mut job = JobConfig::new(
            RepoConfig::new("acme/internal", "main"),
            RepoConfig::new("acme/public", "main"),
            "Bot <bot@acme.dev>",
        );
        job.push = WorkflowConfig {
            origin_include: vec!["**".to_string()],
            ..Default::default()
        };
        job
    }

    #[test]
    fn synthesizer_new_succeeds() {
        Synthesizer::new().expect("Synthesizer::new should succeed with embedded template");
    }

    #[test]
    fn empty_transformations_render_empty_list() {
        let doc = Synthesizer::new().unwrap().render(&make_job()).unwrap();
        assert!(doc.contains("TRANSFORMATIONS = [\n]"), "{doc}");
    }

    #[test]
    fn missing_override_falls_back_to_embedded() {
        let dir = TempDir::new().unwrap();
        let synth = Synthesizer::with_template_dir(Some(dir.path())).unwrap();
        let doc = synth.render(&make_job()).unwrap();
        assert!(doc.contains("core.workflow("));
    }

    #[test]
    fn override_template_is_used() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_TEMPLATE), "# custom {{ sot_repo }}\n").unwrap();
        let synth = Synthesizer::with_template_dir(Some(dir.path())).unwrap();
        let doc = synth.render(&make_job()).unwrap();
        assert_eq!(doc.trim_end(), "# custom https://github.com/acme/internal.git");
    }

    #[test]
    fn no_crlf_in_rendered_output() {
        let doc = Synthesizer::new().unwrap().render(&make_job()).unwrap();
        assert!(!doc.contains('\r'));
    }
}
