//! Render-ready task descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Task;

/// Footer lines used when no references are configured.
pub const DEFAULT_REFERENCES: &[&str] = &[
    "EAIO 6-Layer Architecture",
    "Cognitive Framework Implementation",
    "Task Management System",
];

static BOLD_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*\n]+?)(?:\*\*:|:\*\*)").unwrap());

/// Default footer as owned strings.
pub fn default_references() -> Vec<String> {
    DEFAULT_REFERENCES.iter().map(|s| s.to_string()).collect()
}

/// Rewrite `**Label**:` and `**Label:**` markers to `*Label*:`.
pub fn normalize_labels(body: &str) -> String {
    BOLD_LABEL.replace_all(body, "*${1}*:").into_owned()
}

/// Synthesize a task description.
///
/// Sections, separated by a blank line: epic and sprint, task details,
/// dependencies (if any), acceptance criteria (if any), references footer
/// (if any).
pub fn describe(task: &Task, epic: &str, sprint: &str, references: &[String]) -> String {
    let mut sections = vec![
        format!("*Epic*: {}\n*Sprint*: {}", epic, sprint),
        format!("*Task Details:*\n{}", normalize_labels(task.body.trim())),
    ];

    if !task.dependencies.is_empty() {
        sections.push(format!("*Dependencies:*\n{}", bullets(&task.dependencies)));
    }

    if !task.acceptance_criteria.is_empty() {
        sections.push(format!(
            "*Acceptance Criteria:*\n{}",
            bullets(&task.acceptance_criteria)
        ));
    }

    if !references.is_empty() {
        sections.push(format!("*Architecture References:*\n{}", bullets(references)));
    }

    sections.join("\n\n")
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("* {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_labels() {
        assert_eq!(
            normalize_labels("**Assignee**: Ana\n**Duration:** 2d\n**bold** text"),
            "*Assignee*: Ana\n*Duration*: 2d\n**bold** text"
        );
    }

    #[test]
    fn test_default_references() {
        assert_eq!(default_references().len(), 3);
        assert_eq!(default_references()[0], "EAIO 6-Layer Architecture");
    }
}
