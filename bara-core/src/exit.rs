//! Exit-code taxonomy and classification.
//!
//! The synchronization tool uses some non-zero codes for benign outcomes
//! (`4` means "nothing to do"), so the raw status alone cannot decide whether
//! a CI job failed. [`EXIT_CODES`] maps every known code to an
//! [`ExitOutcome`]; [`classify`] turns a status into success or an
//! [`ExitFailure`].
//!
//! Codes `50..` belong to this orchestrator and are only produced by it.

use std::fmt;

use thiserror::Error;

/// Code raised when a status is not a known tool outcome.
pub const UNKNOWN_FAILURE: i32 = 52;
/// Code reported for rejected configuration.
pub const CONFIG_FAILURE: i32 = 51;
/// Code reported for errors that escaped classification entirely.
pub const UNHANDLED_FAILURE: i32 = 53;

/// Owner of an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// The containerized synchronization tool.
    Copybara,
    /// This orchestrator.
    Action,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Copybara => write!(f, "copybara"),
            Namespace::Action => write!(f, "action"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    KnownFailure,
}

/// Classified meaning of a known exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub namespace: Namespace,
    pub severity: Severity,
    pub message: &'static str,
}

const fn outcome(namespace: Namespace, severity: Severity, message: &'static str) -> ExitOutcome {
    ExitOutcome { namespace, severity, message }
}

/// Every exit code with a known meaning.
pub const EXIT_CODES: &[(i32, ExitOutcome)] = &[
    (0, outcome(Namespace::Copybara, Severity::Success, "Copybara completed successfully.")),
    (1, outcome(Namespace::Copybara, Severity::KnownFailure, "Copybara command line error.")),
    (2, outcome(Namespace::Copybara, Severity::KnownFailure, "Copybara configuration error.")),
    (3, outcome(Namespace::Copybara, Severity::KnownFailure, "Copybara repository error.")),
    (4, outcome(Namespace::Copybara, Severity::Warning, "No-op: Copybara had nothing to do.")),
    (8, outcome(Namespace::Copybara, Severity::KnownFailure, "Copybara was interrupted.")),
    (30, outcome(Namespace::Copybara, Severity::KnownFailure, "Copybara environment error.")),
    (31, outcome(Namespace::Copybara, Severity::KnownFailure, "Copybara internal error.")),
    (50, outcome(Namespace::Action, Severity::Success, "Mirroring completed successfully.")),
    (CONFIG_FAILURE, outcome(Namespace::Action, Severity::KnownFailure, "Mirroring configuration error.")),
    (UNKNOWN_FAILURE, outcome(Namespace::Action, Severity::KnownFailure, "Copybara exited with an unknown error.")),
    (UNHANDLED_FAILURE, outcome(Namespace::Action, Severity::KnownFailure, "Unhandled error.")),
];

/// Look up the outcome registered for `code`.
pub fn lookup(code: i32) -> Option<&'static ExitOutcome> {
    EXIT_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, outcome)| outcome)
}

/// Human-readable message for `code`, if it is known.
pub fn describe(code: i32) -> Option<&'static str> {
    lookup(code).map(|o| o.message)
}

/// A tool exit status that fails the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExitFailure {
    /// Tool-defined failure; carries the tool's own code.
    #[error("copybara failed with exit code {0}")]
    Known(i32),

    /// Status this orchestrator cannot classify; carries the raw status.
    #[error("copybara exited with unclassified status {0}")]
    Unknown(i32),
}

impl ExitFailure {
    /// Code propagated to the caller as the failure signal.
    pub fn code(&self) -> i32 {
        match self {
            ExitFailure::Known(code) => *code,
            ExitFailure::Unknown(_) => UNKNOWN_FAILURE,
        }
    }
}

/// Classify the tool's exit status.
///
/// Success and warning codes of the tool are returned as-is; known tool
/// failures become [`ExitFailure::Known`]; anything else, including codes
/// owned by the orchestrator, becomes [`ExitFailure::Unknown`].
pub fn classify(status: i32) -> Result<i32, ExitFailure> {
    match lookup(status) {
        Some(o) if o.namespace == Namespace::Copybara => match o.severity {
            Severity::Success | Severity::Warning => Ok(status),
            Severity::KnownFailure => Err(ExitFailure::Known(status)),
        },
        _ => Err(ExitFailure::Unknown(status)),
    }
}
