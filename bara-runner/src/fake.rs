//! In-memory stand-ins for the process and repository-host seams.
//!
//! These are part of the public API so that crates driving [`crate::run_job`]
//! or [`crate::Copybara`] can test without docker or network access. Both
//! fakes are cheap to clone and clones share state, so a test keeps one
//! handle and passes another to the code under test.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::RunnerError;
use crate::github::RepoHost;
use crate::process::{ProcessCommand, ProcessRunner};

// ---------------------------------------------------------------------------
// Scripted runner
// ---------------------------------------------------------------------------

/// Records every command and answers with queued exit codes.
///
/// When the queue is empty every command exits `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    codes: Arc<Mutex<VecDeque<i32>>>,
    history: Arc<Mutex<Vec<ProcessCommand>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that answers with `codes`, in order.
    pub fn with_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        let runner = Self::new();
        if let Ok(mut queue) = runner.codes.lock() {
            queue.extend(codes);
        }
        runner
    }

    /// Commands seen so far, in call order.
    pub fn history(&self) -> Vec<ProcessCommand> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn status(&self, command: &ProcessCommand) -> Result<i32, RunnerError> {
        if let Ok(mut history) = self.history.lock() {
            history.push(command.clone());
        }
        let code = self
            .codes
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or(0);
        Ok(code)
    }
}

// ---------------------------------------------------------------------------
// Repository host
// ---------------------------------------------------------------------------

/// A set of `owner/name` repositories; creating one adds it to the set.
#[derive(Debug, Clone, Default)]
pub struct FakeRepoHost {
    repos: Arc<Mutex<BTreeSet<String>>>,
    lookups: Arc<Mutex<Vec<String>>>,
    created: Arc<Mutex<Vec<String>>>,
}

impl FakeRepoHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that already holds `repos`.
    pub fn with_repos<I, S>(repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let host = Self::new();
        if let Ok(mut set) = host.repos.lock() {
            set.extend(repos.into_iter().map(Into::into));
        }
        host
    }

    /// Repositories looked up so far, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Repositories created so far, in call order.
    pub fn created(&self) -> Vec<String> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RepoHost for FakeRepoHost {
    async fn repo_exists(&self, repo: &str) -> Result<bool, RunnerError> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(repo.to_owned());
        }
        Ok(self.repos.lock().map(|r| r.contains(repo)).unwrap_or(false))
    }

    async fn create_repo(&self, repo: &str) -> Result<(), RunnerError> {
        if let Ok(mut repos) = self.repos.lock() {
            repos.insert(repo.to_owned());
        }
        if let Ok(mut created) = self.created.lock() {
            created.push(repo.to_owned());
        }
        Ok(())
    }
}
