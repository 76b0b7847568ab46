//! YAML job files.
//!
//! A job file is the serde_yaml form of [`JobConfig`]:
//!
//! ```yaml
//! sot: { repo: acme/internal, branch: main }
//! destination: { repo: acme/public, branch: main }
//! committer: "Bot <bot@acme.dev>"
//! workflow: push
//! push:
//!   origin_include: ["src/**", "README.md"]
//!   move: ["internal/||public/"]
//! ```

use std::path::Path;

use crate::error::JobFileError;
use crate::types::JobConfig;

/// Load a job from `path`.
///
/// Returns `JobFileError::NotFound` if absent,
/// `JobFileError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<JobConfig, JobFileError> {
    if !path.exists() {
        return Err(JobFileError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| JobFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents).map_err(|source| JobFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a job from YAML text.
pub fn parse(yaml: &str) -> Result<JobConfig, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}
