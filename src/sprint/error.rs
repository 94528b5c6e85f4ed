use std::path::PathBuf;

use thiserror::Error;

use super::model::TaskId;

/// A sprint document that cannot be turned into a `Sprint`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDocument {
    #[error("missing sprint header (expected `# Sprint <number>: <name>`)")]
    MissingHeader,
    #[error("invalid sprint number `{0}`")]
    InvalidSprintNumber(String),
    #[error("duplicate task id {id} (lines {first} and {second})")]
    DuplicateTaskId {
        id: TaskId,
        first: usize,
        second: usize,
    },
}

/// A parsed item that could not be fully resolved. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionAnomaly {
    #[error("task {id} (line {line}) is not inside any epic")]
    OrphanTask { id: TaskId, line: usize },
    #[error("task {id} (line {line}) is numbered for another sprint than sprint {expected}")]
    SprintMismatch {
        id: TaskId,
        line: usize,
        expected: u32,
    },
}

/// Failure to load a sprint file from disk.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: MalformedDocument,
    },
    #[error("{path}: sprint {number} is already defined in {first}")]
    DuplicateSprint {
        path: PathBuf,
        number: u32,
        first: PathBuf,
    },
}

impl DocumentError {
    /// File the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. }
            | Self::Malformed { path, .. }
            | Self::DuplicateSprint { path, .. } => path,
        }
    }
}
