//! Epic-task association by source position.

use std::ops::Range;

use super::describe::describe;
use super::model::{Epic, Task};

/// Epic shown in the description of a task no epic contains.
pub const UNASSIGNED_EPIC: &str = "Unassigned";

/// An epic header and the byte range it owns in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicSpan {
    pub number: u32,
    pub name: String,
    pub goal: String,
    pub span: Range<usize>,
}

/// Epics with their tasks, plus tasks no span contains.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub epics: Vec<Epic>,
    pub orphans: Vec<Task>,
}

/// Index of the span containing `offset`.
///
/// Spans are sorted, contiguous and non-overlapping, so at most one matches.
pub fn span_index(spans: &[EpicSpan], offset: usize) -> Option<usize> {
    let idx = spans.partition_point(|s| s.span.start <= offset).checked_sub(1)?;
    spans[idx].span.contains(&offset).then_some(idx)
}

/// Assign every task to the epic whose span holds its label offset.
///
/// Assigned tasks get their epic name and a synthesized description; the
/// rest come back as orphans, described against the `Unassigned` placeholder.
pub fn resolve(
    tasks: Vec<Task>,
    spans: Vec<EpicSpan>,
    sprint: &str,
    references: &[String],
) -> Resolution {
    let mut epics: Vec<Epic> = spans
        .iter()
        .map(|s| Epic {
            number: s.number,
            name: s.name.clone(),
            goal: s.goal.clone(),
            sprint: sprint.to_string(),
            tasks: Vec::new(),
            span: s.span.clone(),
        })
        .collect();
    let mut orphans = Vec::new();

    for mut task in tasks {
        match span_index(&spans, task.offset) {
            Some(idx) => {
                let epic = &mut epics[idx];
                task.description = describe(&task, &epic.name, sprint, references);
                task.epic = Some(epic.name.clone());
                epic.tasks.push(task);
            }
            None => {
                task.description = describe(&task, UNASSIGNED_EPIC, sprint, references);
                orphans.push(task);
            }
        }
    }

    Resolution { epics, orphans }
}
