//! Error types for bara-core.

use std::path::PathBuf;

use thiserror::Error;

/// A move/replace rule string that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// More than `from||to||path`.
    #[error("rule {rule:?} has {found} `||` segments; expected at most 3 (from||to||path)")]
    TooManySegments { rule: String, found: usize },

    /// The `from` segment is empty.
    #[error("rule {rule:?} has an empty `from` segment")]
    EmptyFrom { rule: String },
}

/// A job that must not be executed.
///
/// Each variant names the CI input the user has to set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("You need to set a value for \"committer\".")]
    MissingCommitter,

    #[error("You need to set a value for \"copybara_image\".")]
    MissingImageName,

    #[error("You need to set a value for \"copybara_image_tag\".")]
    MissingImageTag,

    #[error("You need to set a value for \"origin_include\".")]
    MissingOriginInclude,

    #[error(
        "You need to set values for \"sot_repo\" & \"destination_repo\" or set a value for \"custom_config\"."
    )]
    MissingRepos,

    #[error("You need to set a value for \"access_token\" to create the destination repository.")]
    MissingAccessToken,

    #[error("invalid {field} rule: {source}")]
    InvalidRule {
        field: &'static str,
        #[source]
        source: RuleError,
    },
}

/// Errors loading a YAML job file.
#[derive(Debug, Error)]
pub enum JobFileError {
    /// The job file did not exist at the expected path.
    #[error("job file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error; includes the path and line context from serde_yaml.
    #[error("failed to parse job file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
