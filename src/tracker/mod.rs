//! Remote issue tracker abstraction.
//!
//! Backends:
//! - `jira`: Jira Cloud REST API v3
//! - `stub`: deterministic in-memory tracker for dry runs and tests

use std::fmt;

use thiserror::Error;

use crate::sprint::{Epic, Task};

mod jira;
mod stub;

pub use jira::{adf_text, epic_payload, task_payload, JiraClient, JiraSettings};
pub use stub::{PublishCall, StubPublisher};

/// Key of an issue created in the tracker (e.g. `SCRUM-42`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single create call that did not produce an issue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The tracker answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// The request never got an answer.
    #[error("transport error: {0}")]
    Transport(String),
    /// The tracker answered, but not in the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Tracker backend that turns parsed epics and tasks into remote issues.
///
/// Calls are not retried; a failure is final for that item.
pub trait Publisher {
    /// Create an epic for the given sprint.
    fn create_epic(&self, epic: &Epic, sprint_number: u32) -> Result<RemoteId, PublishError>;

    /// Create a task under an already created epic.
    fn create_task(&self, task: &Task, parent: &RemoteId) -> Result<RemoteId, PublishError>;

    /// Project the issues are created in.
    fn project_key(&self) -> &str;
}
