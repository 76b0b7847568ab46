//! Error types for bara-renderer.

use std::path::PathBuf;

use thiserror::Error;

use bara_core::RuleError;

/// All errors that can arise while synthesizing a config document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// A move/replace rule could not be turned into a clause.
    #[error("transformation rule error: {0}")]
    Rule(#[from] RuleError),

    /// Filesystem error while loading a template override.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
