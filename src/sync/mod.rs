//! Import orchestration: load sprint documents, publish them, tally outcomes.
//!
//! Publishing is sequential and in document order. Every epic is created
//! before any of its tasks; the tasks of an epic that failed are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::color::{self, emoji};
use crate::log::RunLogger;
use crate::sprint::{
    load_sprint_file, DocumentError, ExtractionAnomaly, ParseOptions, ParsedSprint, Task, TaskId,
};
use crate::tracker::{Publisher, RemoteId};

mod stats;

#[cfg(test)]
mod tests;

pub use stats::{RunStats, RunStatus, MOSTLY_SUCCESS_RATE, PARTIAL_SUCCESS_RATE};

/// File name prefix of sprint documents.
pub const SPRINT_FILE_PREFIX: &str = "sprint_";
/// File name extension of sprint documents.
pub const SPRINT_FILE_EXTENSION: &str = "md";

/// A successfully parsed sprint file.
#[derive(Debug, Clone)]
pub struct SprintDocument {
    pub path: PathBuf,
    pub parsed: ParsedSprint,
}

/// Everything found in a sprint directory.
#[derive(Debug, Default)]
pub struct DocumentSet {
    /// Parsed documents ordered by sprint number.
    pub documents: Vec<SprintDocument>,
    /// Files that could not be turned into a sprint.
    pub failed: Vec<DocumentError>,
}

impl DocumentSet {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn total_tasks(&self) -> usize {
        self.documents.iter().map(|d| d.parsed.total_tasks()).sum()
    }
}

/// List `sprint_*.md` files in `dir`, sorted by file name.
pub fn discover_sprint_files(dir: &Path) -> Result<Vec<PathBuf>, DocumentError> {
    let entries = fs::read_dir(dir).map_err(|source| DocumentError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_sprint_file(p))
        .collect();
    files.sort();
    Ok(files)
}

fn is_sprint_file(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(SPRINT_FILE_PREFIX));
    let ext_ok = path.extension().and_then(|e| e.to_str()) == Some(SPRINT_FILE_EXTENSION);
    name_ok && ext_ok
}

/// Parse every sprint file in `dir`.
///
/// A file that fails to parse is recorded and the rest still load. When two
/// files declare the same sprint number the one sorting later is rejected.
/// A non-empty `filter` keeps only the listed sprint numbers.
pub fn load_documents(
    dir: &Path,
    filter: &[u32],
    options: &ParseOptions,
) -> Result<DocumentSet, DocumentError> {
    let mut set = DocumentSet::default();
    let mut seen: HashMap<u32, PathBuf> = HashMap::new();

    for path in discover_sprint_files(dir)? {
        let parsed = match load_sprint_file(&path, options) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "skipping sprint document");
                set.failed.push(e);
                continue;
            }
        };

        let number = parsed.sprint.number;
        if let Some(first) = seen.get(&number) {
            let e = DocumentError::DuplicateSprint {
                path: path.clone(),
                number,
                first: first.clone(),
            };
            warn!(error = %e, "skipping sprint document");
            set.failed.push(e);
            continue;
        }
        seen.insert(number, path.clone());

        if !filter.is_empty() && !filter.contains(&number) {
            debug!(sprint = number, path = %path.display(), "filtered out");
            continue;
        }
        set.documents.push(SprintDocument { path, parsed });
    }

    set.documents.sort_by_key(|d| d.parsed.sprint.number);
    Ok(set)
}

/// Options for a publishing run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Delay after every task publish attempt.
    pub pacing: Duration,
    /// Print per-item progress lines to stdout.
    pub echo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpicStatus {
    Created(RemoteId),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Created(RemoteId),
    Failed(String),
    /// Not attempted because the owning epic was not created.
    SkippedNoEpic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub id: TaskId,
    pub title: String,
    pub story_points: u32,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicOutcome {
    pub name: String,
    pub status: EpicStatus,
    pub tasks: Vec<TaskOutcome>,
}

impl EpicOutcome {
    pub fn tasks_created(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.status, TaskStatus::Created(_)))
            .count()
    }

    /// Story points of the tasks that were created.
    pub fn points_created(&self) -> u32 {
        self.tasks
            .iter()
            .filter(|t| matches!(t.status, TaskStatus::Created(_)))
            .map(|t| t.story_points)
            .fold(0, u32::saturating_add)
    }
}

/// What happened to one sprint document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintOutcome {
    pub number: u32,
    pub name: String,
    pub epics: Vec<EpicOutcome>,
    pub anomalies: Vec<ExtractionAnomaly>,
}

impl SprintOutcome {
    pub fn epics_created(&self) -> usize {
        self.epics
            .iter()
            .filter(|e| matches!(e.status, EpicStatus::Created(_)))
            .count()
    }

    pub fn tasks_created(&self) -> usize {
        self.epics.iter().map(EpicOutcome::tasks_created).sum()
    }

    pub fn points_created(&self) -> u32 {
        self.epics
            .iter()
            .map(EpicOutcome::points_created)
            .fold(0, u32::saturating_add)
    }
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub sprints: Vec<SprintOutcome>,
    pub stats: RunStats,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        self.stats.status()
    }
}

/// Drives a [`Publisher`] over parsed sprints.
pub struct Orchestrator<P: Publisher> {
    publisher: P,
    options: SyncOptions,
    logger: Option<RunLogger>,
    stats: RunStats,
}

impl<P: Publisher> Orchestrator<P> {
    pub fn new(publisher: P, options: SyncOptions) -> Self {
        Self {
            publisher,
            options,
            logger: None,
            stats: RunStats::default(),
        }
    }

    /// Record every item outcome in a run log.
    pub fn with_logger(mut self, logger: RunLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Publish one parsed sprint: epics first, then each epic's tasks.
    pub fn publish_sprint(&mut self, parsed: &ParsedSprint) -> SprintOutcome {
        let sprint = &parsed.sprint;
        let scope = format!("sprint {}", sprint.number);
        info!(sprint = sprint.number, name = %sprint.name, "publishing sprint");
        self.echo(format!(
            "\n{} {}",
            emoji::SPRINT,
            color::label(&format!("Sprint {}: {}", sprint.number, sprint.name))
        ));

        for anomaly in &parsed.anomalies {
            self.record(&scope, &format!("anomaly: {}", anomaly));
        }

        let mut epics = Vec::with_capacity(sprint.epics.len());
        for epic in &sprint.epics {
            let status = match self.publisher.create_epic(epic, sprint.number) {
                Ok(key) => {
                    self.stats.epics_created += 1;
                    self.record(&scope, &format!("epic {} created as {}", epic.name, key));
                    self.echo(format!(
                        "  {} Created Epic: {} - {}",
                        emoji::CHECK,
                        color::key(key.as_str()),
                        epic.name
                    ));
                    EpicStatus::Created(key)
                }
                Err(e) => {
                    self.stats.epics_failed += 1;
                    warn!(epic = %epic.name, error = %e, "epic not created");
                    self.record(&scope, &format!("epic {} failed: {}", epic.name, e));
                    self.echo(format!(
                        "  {} Failed to create epic {}: {}",
                        emoji::CROSS,
                        epic.name,
                        color::error(&e.to_string())
                    ));
                    EpicStatus::Failed(e.to_string())
                }
            };

            let mut tasks = Vec::with_capacity(epic.tasks.len());
            for task in &epic.tasks {
                let task_status = match &status {
                    EpicStatus::Created(parent) => self.publish_task(task, parent),
                    EpicStatus::Failed(_) => {
                        self.stats.tasks_skipped += 1;
                        self.record(&task.id.to_string(), "skipped: epic was not created");
                        TaskStatus::SkippedNoEpic
                    }
                };
                tasks.push(TaskOutcome {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    story_points: task.story_points,
                    status: task_status,
                });
            }

            epics.push(EpicOutcome {
                name: epic.name.clone(),
                status,
                tasks,
            });
        }

        self.stats.sprints_processed += 1;
        self.stats.anomalies += parsed.anomalies.len();

        SprintOutcome {
            number: sprint.number,
            name: sprint.name.clone(),
            epics,
            anomalies: parsed.anomalies.clone(),
        }
    }

    fn publish_task(&mut self, task: &Task, parent: &RemoteId) -> TaskStatus {
        let scope = task.id.to_string();
        let status = match self.publisher.create_task(task, parent) {
            Ok(key) => {
                self.stats.tasks_created += 1;
                self.record(&scope, &format!("created as {} under {}", key, parent));
                self.echo(format!(
                    "    {} {}: {} {}",
                    emoji::TASK,
                    task.id,
                    task.title,
                    color::dim(&format!("({})", key))
                ));
                TaskStatus::Created(key)
            }
            Err(e) => {
                self.stats.tasks_failed += 1;
                warn!(task = %task.id, error = %e, "task not created");
                self.record(&scope, &format!("failed: {}", e));
                self.echo(format!(
                    "    {} Failed to create task {}: {}",
                    emoji::CROSS,
                    task.id,
                    color::error(&e.to_string())
                ));
                TaskStatus::Failed(e.to_string())
            }
        };

        if !self.options.pacing.is_zero() {
            thread::sleep(self.options.pacing);
        }
        status
    }

    /// Publish every document in order and produce the final report.
    pub fn run(&mut self, set: &DocumentSet) -> RunReport {
        self.stats.documents_failed += set.failed.len();
        for failure in &set.failed {
            self.record("document", &format!("skipped: {}", failure));
        }

        let sprints = set
            .documents
            .iter()
            .map(|doc| self.publish_sprint(&doc.parsed))
            .collect();

        let stats = self.stats;
        self.record(
            "run",
            &format!(
                "finished: {} epics, {} tasks created, {} failed, {} skipped ({})",
                stats.epics_created,
                stats.tasks_created,
                stats.tasks_failed,
                stats.tasks_skipped,
                stats.status()
            ),
        );

        RunReport { sprints, stats }
    }

    fn record(&self, scope: &str, message: &str) {
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log(scope, message) {
                warn!(path = %logger.path.display(), error = %e, "failed to write run log");
            }
        }
    }

    fn echo(&self, line: String) {
        if self.options.echo {
            println!("{}", line);
        }
    }
}
