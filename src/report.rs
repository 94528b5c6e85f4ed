//! Plain-text reports: sprint previews, creation summaries, validation.

use crate::config::ProjectInfo;
use crate::sync::{RunStats, RunStatus, SprintDocument};

/// Goals longer than this are cut in previews.
pub const GOAL_PREVIEW_CHARS: usize = 60;

/// Failed-task count above which a dedicated warning is added.
const HIGH_FAILURE_COUNT: usize = 10;

/// Cut `text` to `max` characters, appending `...` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}

/// Minimal left-aligned text table.
#[derive(Debug, Clone)]
pub struct Table {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        let mut out = vec![self.title.clone(), line(&self.headers), line(&rule)];
        out.extend(self.rows.iter().map(|r| line(r)));
        out.join("\n")
    }
}

/// Overview of one parsed sprint before anything is published.
pub fn sprint_preview(doc: &SprintDocument) -> String {
    let sprint = &doc.parsed.sprint;
    let mut out = vec![
        format!("Sprint {}: {}", sprint.number, sprint.name),
        format!("File: {}", doc.path.display()),
        format!("Layer Focus: {}", sprint.layer_focus),
        format!("Duration: {}", sprint.duration),
        format!(
            "Story Points: {} (target {})",
            sprint.story_points(),
            sprint.story_points_target
        ),
        String::new(),
    ];

    let mut table = Table::new("Epics", &["Epic", "Goal", "Tasks", "Points"]);
    for epic in &sprint.epics {
        table.row([
            epic.name.clone(),
            truncate(&epic.goal, GOAL_PREVIEW_CHARS),
            epic.tasks.len().to_string(),
            epic.story_points().to_string(),
        ]);
    }
    out.push(table.render());

    if !doc.parsed.orphans.is_empty() {
        out.push(String::new());
        out.push("Tasks outside any epic (not published):".to_string());
        for task in &doc.parsed.orphans {
            out.push(format!("  {} {} (line {})", task.id, task.title, task.line));
        }
    }

    out.push(String::new());
    out.push(format!(
        "Total: {} epics, {} tasks",
        sprint.epics.len(),
        sprint.task_count()
    ));
    out.join("\n")
}

/// Per-sprint counts of what will be (or was) sent to the tracker, plus totals.
pub fn creation_summary(docs: &[SprintDocument]) -> String {
    let mut table = Table::new(
        "Items to be created",
        &["Sprint", "Epics", "Tasks", "Story Points"],
    );
    let (mut epics, mut tasks, mut points) = (0usize, 0usize, 0u32);

    for doc in docs {
        let sprint = &doc.parsed.sprint;
        table.row([
            format!("Sprint {}", sprint.number),
            sprint.epics.len().to_string(),
            sprint.task_count().to_string(),
            sprint.story_points().to_string(),
        ]);
        epics += sprint.epics.len();
        tasks += sprint.task_count();
        points = points.saturating_add(sprint.story_points());
    }

    table.row([
        "TOTAL".to_string(),
        epics.to_string(),
        tasks.to_string(),
        points.to_string(),
    ]);
    table.render()
}

/// End-of-run metrics with the overall status.
pub fn validation_report(stats: &RunStats) -> String {
    let mark = |ok: bool| if ok { "ok" } else { "FAIL" };
    let mut table = Table::new("Validation report", &["Metric", "Value", "Status"]);

    table.row([
        "Sprints Processed".to_string(),
        stats.sprints_processed.to_string(),
        mark(true).to_string(),
    ]);
    table.row([
        "Documents Failed".to_string(),
        stats.documents_failed.to_string(),
        mark(stats.documents_failed == 0).to_string(),
    ]);
    table.row([
        "Epics Created".to_string(),
        format!("{}/{}", stats.epics_created, stats.epics_attempted()),
        format!("{:.1}%", stats.epic_success_rate()),
    ]);
    table.row([
        "Tasks Created".to_string(),
        format!("{}/{}", stats.tasks_created, stats.tasks_attempted()),
        format!("{:.1}%", stats.task_success_rate()),
    ]);
    table.row([
        "Tasks Failed".to_string(),
        stats.tasks_failed.to_string(),
        mark(stats.tasks_failed == 0).to_string(),
    ]);
    table.row([
        "Tasks Skipped".to_string(),
        stats.tasks_skipped.to_string(),
        mark(stats.tasks_skipped == 0).to_string(),
    ]);
    table.row([
        "Anomalies".to_string(),
        stats.anomalies.to_string(),
        mark(stats.anomalies == 0).to_string(),
    ]);
    table.row([
        "Overall Status".to_string(),
        stats.status().to_string(),
        mark(stats.status().is_acceptable()).to_string(),
    ]);
    table.render()
}

/// Follow-up advice for a finished run.
pub fn recommendations(stats: &RunStats) -> Vec<String> {
    let mut out: Vec<String> = match stats.status() {
        RunStatus::Success => vec![
            "All tasks and epics created successfully".to_string(),
            "Ready to proceed with development work".to_string(),
        ],
        RunStatus::MostlySuccess => vec![
            "Most tasks created successfully with minor issues".to_string(),
            "Review failed items in the run log and retry if needed".to_string(),
        ],
        RunStatus::PartialSuccess => vec![
            "Partial success: significant issues detected".to_string(),
            "Check required fields and issue types in the Jira project".to_string(),
            "Consider creating the failed items manually".to_string(),
        ],
        RunStatus::MostlyFailed | RunStatus::Failed => vec![
            "Major issues detected during import".to_string(),
            "Check the Jira connection and project permissions".to_string(),
            "Review required field configuration".to_string(),
        ],
    };

    if stats.tasks_failed > HIGH_FAILURE_COUNT {
        out.push(format!("High failure count: {} tasks failed", stats.tasks_failed));
    }
    if stats.epics_created > 0 && stats.tasks_created == 0 && stats.tasks_failed == 0 {
        out.push("Epics created but no tasks found; check the task label format".to_string());
    }
    if stats.tasks_skipped > 0 {
        out.push(format!(
            "{} tasks were skipped because their epic failed; rerun once the epic issue is fixed",
            stats.tasks_skipped
        ));
    }
    if stats.anomalies > 0 {
        out.push(format!(
            "{} parse anomalies: move stray tasks under an epic header",
            stats.anomalies
        ));
    }
    out
}

/// Configured tracker projects, marking the active one.
pub fn project_table(projects: &[ProjectInfo], current: &str) -> String {
    let mut table = Table::new("Projects", &["", "Key", "Name", "Description", "Board"]);
    for p in projects {
        table.row([
            if p.key == current { "*" } else { "" }.to_string(),
            p.key.clone(),
            p.name.clone(),
            p.description.clone(),
            p.board_id.clone().unwrap_or_default(),
        ]);
    }
    table.render()
}
