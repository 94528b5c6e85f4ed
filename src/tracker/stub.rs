use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::sprint::{Epic, Task};

use super::{PublishError, Publisher, RemoteId};

/// One call made against a [`StubPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishCall {
    Epic { sprint: u32, name: String },
    Task { id: String, parent: String },
}

/// Stub tracker for dry runs and tests.
///
/// Hands out deterministic keys `<PROJECT>-<n>` without network calls and
/// records every call. Specific epics (by name) and tasks (by id) can be
/// made to fail.
#[derive(Debug)]
pub struct StubPublisher {
    project_key: String,
    next: Cell<u32>,
    calls: RefCell<Vec<PublishCall>>,
    failing_epics: HashSet<String>,
    failing_tasks: HashSet<String>,
}

impl StubPublisher {
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            next: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            failing_epics: HashSet::new(),
            failing_tasks: HashSet::new(),
        }
    }

    /// Fail `create_epic` for the epic with this name.
    pub fn fail_epic(mut self, name: impl Into<String>) -> Self {
        self.failing_epics.insert(name.into());
        self
    }

    /// Fail `create_task` for the task with this id (e.g. `T1.2`).
    pub fn fail_task(mut self, id: impl Into<String>) -> Self {
        self.failing_tasks.insert(id.into());
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.borrow().clone()
    }

    fn next_key(&self) -> RemoteId {
        let n = self.next.get();
        self.next.set(n + 1);
        RemoteId::new(format!("{}-{}", self.project_key, n))
    }

    fn rejected(what: &str) -> PublishError {
        PublishError::Http {
            status: 400,
            body: format!("stub rejected {}", what),
        }
    }
}

impl Publisher for StubPublisher {
    fn create_epic(&self, epic: &Epic, sprint_number: u32) -> Result<RemoteId, PublishError> {
        self.calls.borrow_mut().push(PublishCall::Epic {
            sprint: sprint_number,
            name: epic.name.clone(),
        });
        if self.failing_epics.contains(&epic.name) {
            return Err(Self::rejected(&epic.name));
        }
        Ok(self.next_key())
    }

    fn create_task(&self, task: &Task, parent: &RemoteId) -> Result<RemoteId, PublishError> {
        let id = task.id.to_string();
        self.calls.borrow_mut().push(PublishCall::Task {
            id: id.clone(),
            parent: parent.to_string(),
        });
        if self.failing_tasks.contains(&id) {
            return Err(Self::rejected(&id));
        }
        Ok(self.next_key())
    }

    fn project_key(&self) -> &str {
        &self.project_key
    }
}
