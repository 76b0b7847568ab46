//! bara core library: job model, validation, exit-code taxonomy.
//!
//! - [`types`]: repositories, image, workflow rules, [`JobConfig`]
//! - [`validate`]: pre-flight checks, [`ConfigError`]
//! - [`exit`]: exit-code table and [`classify`]
//! - [`job_file`]: YAML job files

pub mod error;
pub mod exit;
pub mod job_file;
pub mod types;
pub mod validate;

pub use error::{ConfigError, JobFileError, RuleError};
pub use exit::{classify, ExitFailure, ExitOutcome, Namespace, Severity};
pub use types::{
    Credentials, DockerConfig, JobConfig, RepoConfig, SourceRef, TransformRule, WorkflowConfig,
    WorkflowMode,
};
pub use validate::{validate, validate_custom};
