//! Domain types for a single mirroring job.
//!
//! All types are serializable/deserializable via serde + serde_yaml so a job
//! can be described in a YAML file as well as assembled from CI inputs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Separator of the `from||to||path` rule micro-format.
pub const RULE_DELIMITER: &str = "||";

/// Path glob used when a rule does not name one.
pub const DEFAULT_RULE_PATH: &str = "**";

/// Image used when a job file does not name one.
pub const DEFAULT_IMAGE_NAME: &str = "olivr/copybara";
pub const DEFAULT_IMAGE_TAG: &str = "latest";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Commit or ref identifier handed to the `pr` workflow.
///
/// Accepts both textual refs and numeric pull-request numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(pub String);

impl SourceRef {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SourceRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SourceRef {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<u64> for SourceRef {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// ---------------------------------------------------------------------------
// Workflow mode
// ---------------------------------------------------------------------------

/// Named operation the container is asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowMode {
    /// Mirror the SoT into a pull request on the destination.
    #[default]
    Push,
    /// First push: initialise destination history.
    Init,
    /// Review flow driven by a pull request on the destination.
    Pr,
    /// Any other workflow name, passed through verbatim.
    Custom(String),
}

impl WorkflowMode {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowMode::Push => "push",
            WorkflowMode::Init => "init",
            WorkflowMode::Pr => "pr",
            WorkflowMode::Custom(name) => name,
        }
    }

    /// Only the initial push renames before rewriting contents.
    pub fn moves_first(&self) -> bool {
        matches!(self, WorkflowMode::Push)
    }
}

impl fmt::Display for WorkflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for WorkflowMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "push" => WorkflowMode::Push,
            "init" => WorkflowMode::Init,
            "pr" => WorkflowMode::Pr,
            _ => WorkflowMode::Custom(s),
        }
    }
}

impl From<&str> for WorkflowMode {
    fn from(s: &str) -> Self {
        WorkflowMode::from(s.to_owned())
    }
}

impl From<WorkflowMode> for String {
    fn from(mode: WorkflowMode) -> Self {
        mode.as_str().to_owned()
    }
}

impl FromStr for WorkflowMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(WorkflowMode::from(s))
    }
}

// ---------------------------------------------------------------------------
// Transformation rules
// ---------------------------------------------------------------------------

/// One move/replace rule: `from` is rewritten to `to` within `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRule {
    pub from: String,
    pub to: Option<String>,
    pub path: Option<String>,
}

impl TransformRule {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into(), to: None, path: None }
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn within(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replacement text; empty when the rule names none.
    pub fn to_or_default(&self) -> &str {
        self.to.as_deref().unwrap_or("")
    }

    /// Path glob; `**` when the rule names none.
    pub fn path_or_default(&self) -> &str {
        match self.path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_RULE_PATH,
        }
    }
}

impl FromStr for TransformRule {
    type Err = RuleError;

    /// Parse `from[||to[||path]]`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = raw.split(RULE_DELIMITER).collect();
        if segments.len() > 3 {
            return Err(RuleError::TooManySegments {
                rule: raw.to_owned(),
                found: segments.len(),
            });
        }
        let from = segments[0];
        if from.is_empty() {
            return Err(RuleError::EmptyFrom { rule: raw.to_owned() });
        }
        Ok(TransformRule {
            from: from.to_owned(),
            to: segments.get(1).map(|s| (*s).to_owned()),
            path: segments
                .get(2)
                .filter(|s| !s.is_empty())
                .map(|s| (*s).to_owned()),
        })
    }
}

/// Parse every non-empty rule string, preserving order.
pub fn parse_rules(raw: &[String]) -> Result<Vec<TransformRule>, RuleError> {
    raw.iter()
        .filter(|r| !r.is_empty())
        .map(|r| r.parse())
        .collect()
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A git repository (short `owner/name` identifier) and branch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepoConfig {
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl RepoConfig {
    pub fn new(repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self { repo: repo.into(), branch: branch.into() }
    }

    /// Full clone URL on the hosting provider.
    pub fn url(&self) -> String {
        format!("https://github.com/{}.git", self.repo)
    }
}

/// Container image hosting the synchronization tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfig {
    pub name: String,
    pub tag: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_IMAGE_NAME.to_owned(),
            tag: DEFAULT_IMAGE_TAG.to_owned(),
        }
    }
}

impl DockerConfig {
    /// `name:tag` reference used by `docker pull`.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.name, self.tag)
    }
}

/// File selection and rewrite rules of the push workflow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub origin_include: Vec<String>,
    #[serde(default)]
    pub origin_exclude: Vec<String>,
    #[serde(default)]
    pub destination_include: Vec<String>,
    #[serde(default)]
    pub destination_exclude: Vec<String>,
    /// Encoded `from||to||path` move rules.
    #[serde(default, rename = "move")]
    pub moves: Vec<String>,
    /// Encoded `from||to||path` replace rules.
    #[serde(default, rename = "replace")]
    pub replaces: Vec<String>,
}

impl WorkflowConfig {
    pub fn has_origin_include(&self) -> bool {
        self.origin_include.iter().any(|g| !g.is_empty())
    }

    pub fn move_rules(&self) -> Result<Vec<TransformRule>, RuleError> {
        parse_rules(&self.moves)
    }

    pub fn replace_rules(&self) -> Result<Vec<TransformRule>, RuleError> {
        parse_rules(&self.replaces)
    }
}

/// Secrets staged on the host before the container runs.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub ssh_key: String,
    #[serde(default)]
    pub known_hosts: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(s: &str) -> &'static str {
            if s.is_empty() { "<empty>" } else { "<redacted>" }
        }
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("ssh_key", &redact(&self.ssh_key))
            .field("known_hosts", &self.known_hosts)
            .finish()
    }
}

/// Everything needed to drive one mirroring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub sot: RepoConfig,
    pub destination: RepoConfig,
    /// Free-form `Name <email>`; only checked for presence.
    pub committer: String,
    #[serde(default)]
    pub push: WorkflowConfig,
    #[serde(default)]
    pub workflow: WorkflowMode,
    #[serde(default)]
    pub image: DockerConfig,

    /// Hand-written config document that replaces synthesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_config: Option<PathBuf>,
    /// Extra options forwarded to the tool.
    #[serde(default)]
    pub copybara_options: Vec<String>,
    /// Source reference for the `pr` workflow.
    #[serde(default)]
    pub pr_number: SourceRef,
    /// Create the destination repository first when it does not exist.
    #[serde(default)]
    pub create_repo: bool,
    /// Login assigned to the resulting pull request.
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub credentials: Credentials,
}

impl JobConfig {
    /// A job with only the common fields set; everything else defaulted.
    pub fn new(sot: RepoConfig, destination: RepoConfig, committer: impl Into<String>) -> Self {
        Self {
            sot,
            destination,
            committer: committer.into(),
            push: WorkflowConfig::default(),
            workflow: WorkflowMode::default(),
            image: DockerConfig::default(),
            custom_config: None,
            copybara_options: vec![],
            pr_number: SourceRef::default(),
            create_repo: false,
            actor: String::new(),
            credentials: Credentials::default(),
        }
    }

    /// Extra options with blank entries dropped.
    pub fn extra_options(&self) -> Vec<String> {
        self.copybara_options
            .iter()
            .filter(|o| !o.is_empty())
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_without_path_defaults_to_catch_all() {
        let rule: TransformRule = "a/b||c/d".parse().unwrap();
        assert_eq!(rule.from, "a/b");
        assert_eq!(rule.to_or_default(), "c/d");
        assert_eq!(rule.path_or_default(), "**");
    }

    #[test]
    fn rule_with_path_keeps_it() {
        let rule: TransformRule = "a||b||x/**".parse().unwrap();
        assert_eq!(rule, TransformRule::new("a").to("b").within("x/**"));
        assert_eq!(rule.path_or_default(), "x/**");
    }

    #[test]
    fn rule_without_to_replaces_with_empty() {
        let rule: TransformRule = "a".parse().unwrap();
        assert_eq!(rule.to, None);
        assert_eq!(rule.to_or_default(), "");
    }

    #[test]
    fn rule_with_empty_path_segment_uses_catch_all() {
        let rule: TransformRule = "a||b||".parse().unwrap();
        assert_eq!(rule.path, None);
        assert_eq!(rule.path_or_default(), "**");
    }

    #[test]
    fn rule_with_four_segments_is_rejected() {
        let err = "a||b||c||d".parse::<TransformRule>().unwrap_err();
        assert!(matches!(err, RuleError::TooManySegments { found: 4, .. }));
    }

    #[test]
    fn rule_with_empty_from_is_rejected() {
        let err = "||b".parse::<TransformRule>().unwrap_err();
        assert!(matches!(err, RuleError::EmptyFrom { .. }));
    }

    #[test]
    fn parse_rules_skips_blank_entries() {
        let raw = vec!["".to_string(), "a||b".to_string(), "".to_string()];
        let rules = parse_rules(&raw).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn workflow_mode_from_string() {
        assert_eq!(WorkflowMode::from("push"), WorkflowMode::Push);
        assert_eq!(WorkflowMode::from("init"), WorkflowMode::Init);
        assert_eq!(WorkflowMode::from("pr"), WorkflowMode::Pr);
        assert_eq!(
            WorkflowMode::from("nightly"),
            WorkflowMode::Custom("nightly".to_string())
        );
        assert_eq!(WorkflowMode::from("nightly").to_string(), "nightly");
    }

    #[test]
    fn only_push_moves_first() {
        assert!(WorkflowMode::Push.moves_first());
        assert!(!WorkflowMode::Pr.moves_first());
        assert!(!WorkflowMode::Init.moves_first());
    }

    #[test]
    fn source_ref_from_number() {
        assert_eq!(SourceRef::from(42u64).to_string(), "42");
    }

    #[test]
    fn repo_url_uses_hosting_scheme() {
        let repo = RepoConfig::new("acme/widgets", "main");
        assert_eq!(repo.url(), "https://github.com/acme/widgets.git");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials {
            access_token: "ghp_secret".to_string(),
            ssh_key: String::new(),
            known_hosts: String::new(),
        };
        let printed = format!("{creds:?}");
        assert!(!printed.contains("ghp_secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn has_origin_include_ignores_blank_entries() {
        let push = WorkflowConfig {
            origin_include: vec!["".to_string()],
            ..Default::default()
        };
        assert!(!push.has_origin_include());
    }
}
