//! Sprint document parser.
//!
//! A sprint document looks like:
//!
//! ```text
//! # Sprint 3: Core Platform
//! **Focus**: Data layer with PostgreSQL
//! **Duration**: 10 days
//! **Story Points Target**: 40
//!
//! ### Epic 1: Setup
//! **Goal**: Bootstrap storage
//!
//! **T3.1** 🔴 Init DB
//! **Story Points**: 5
//! **T3.2** - Init Cache
//! **T3.3** Wire health checks
//! ```
//!
//! Tasks are tokenized with their byte offsets and assigned to the epic whose
//! span contains them.

mod describe;
mod error;
mod fields;
mod model;
mod parse;
mod resolve;


use std::fs;
use std::path::Path;

pub use describe::{default_references, describe, normalize_labels, DEFAULT_REFERENCES};
pub use error::{DocumentError, ExtractionAnomaly, MalformedDocument};
pub use fields::{
    extract_acceptance_criteria, extract_assignee, extract_dependencies, extract_duration,
    extract_priority, extract_story_points, parse_dependency_list,
};
pub use model::{
    Epic, LabelFormat, Priority, Sprint, Task, TaskId, DEFAULT_ASSIGNEE, DEFAULT_FOCUS,
    DEFAULT_SPRINT_DURATION, DEFAULT_TASK_DURATION,
};
pub use parse::{parse_sprint, parse_sprint_with, ParseOptions, ParsedSprint};
pub use resolve::{resolve, span_index, EpicSpan, Resolution, UNASSIGNED_EPIC};

/// Read and parse a sprint file.
pub fn load_sprint_file(path: &Path, options: &ParseOptions) -> Result<ParsedSprint, DocumentError> {
    let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sprint_with(&text, options).map_err(|source| DocumentError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
