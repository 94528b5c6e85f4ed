use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::describe::default_references;
use super::error::{ExtractionAnomaly, MalformedDocument};
use super::fields::{
    extract_acceptance_criteria, extract_assignee, extract_dependencies, extract_duration,
    extract_priority, extract_story_points, first_int, label_value, labeled_line,
};
use super::model::{
    LabelFormat, Priority, Sprint, Task, TaskId, DEFAULT_FOCUS, DEFAULT_SPRINT_DURATION,
};
use super::resolve::{resolve, EpicSpan};

static SPRINT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[ \t]+Sprint[ \t]+(\d+)[ \t]*:[ \t]*(.*\S)").unwrap());
static EPIC_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###[ \t]+Epic[ \t]+(\d+)[ \t]*:[ \t]*(.*\S)").unwrap());
static TASK_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?:#{1,6}|[-*+](?:[ \t]+\[[ xX]\])?|\d+[.)])[ \t]+)?(\*\*T(\d+)\.(\d+)\*\*)(.*)$",
    )
    .unwrap()
});
/// A top-level or second-level heading; ends the body of the task above it.
static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,2}[ \t]").unwrap());

static FOCUS: Lazy<Regex> = Lazy::new(|| labeled_line("Focus"));
static SPRINT_DURATION: Lazy<Regex> = Lazy::new(|| labeled_line("Duration"));
static POINTS_TARGET: Lazy<Regex> = Lazy::new(|| labeled_line("Story Points Target"));
static GOAL: Lazy<Regex> = Lazy::new(|| labeled_line("Goal"));

/// Title used when a label line carries no title text.
const UNTITLED: &str = "Untitled task";

/// Options that shape parsed output.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Footer lines for synthesized task descriptions.
    pub references: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            references: default_references(),
        }
    }
}

/// Result of parsing one sprint document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSprint {
    pub sprint: Sprint,
    /// Tasks that fell outside every epic span, in document order.
    pub orphans: Vec<Task>,
    pub anomalies: Vec<ExtractionAnomaly>,
}

impl ParsedSprint {
    /// Number of tasks found in the document, assigned or not.
    pub fn total_tasks(&self) -> usize {
        self.sprint.task_count() + self.orphans.len()
    }
}

/// A task label line found during tokenization.
struct LabelToken<'a> {
    /// Start of the line holding the label.
    line_start: usize,
    /// Start of the `**T` marker.
    offset: usize,
    /// End of the label line (excluding the newline).
    line_end: usize,
    id: TaskId,
    rest: &'a str,
}

/// An epic header found during tokenization.
struct EpicToken<'a> {
    start: usize,
    header_end: usize,
    number: &'a str,
    name: &'a str,
}

/// Parse a sprint document with default options.
pub fn parse_sprint(text: &str) -> Result<ParsedSprint, MalformedDocument> {
    parse_sprint_with(text, &ParseOptions::default())
}

/// Parse a sprint document.
///
/// Only the `# Sprint <number>: <name>` header is mandatory. Tasks are
/// located with their offsets in one pass and handed to the resolver
/// together with the epic spans.
pub fn parse_sprint_with(
    text: &str,
    options: &ParseOptions,
) -> Result<ParsedSprint, MalformedDocument> {
    let header = SPRINT_HEADER
        .captures(text)
        .ok_or(MalformedDocument::MissingHeader)?;
    let number_str = &header[1];
    let number: u32 = number_str
        .parse()
        .map_err(|_| MalformedDocument::InvalidSprintNumber(number_str.to_string()))?;
    let name = header[2].trim().to_string();

    let labels = tokenize_labels(text);
    let epics = tokenize_epics(text);

    let preamble_end = labels
        .first()
        .map(|l| l.line_start)
        .into_iter()
        .chain(epics.first().map(|e| e.start))
        .min()
        .unwrap_or(text.len());
    let preamble = &text[..preamble_end];

    let layer_focus = label_value(&FOCUS, preamble)
        .map(strip_with_clause)
        .unwrap_or(DEFAULT_FOCUS)
        .to_string();
    let duration = label_value(&SPRINT_DURATION, preamble)
        .unwrap_or(DEFAULT_SPRINT_DURATION)
        .to_string();
    let story_points_target = label_value(&POINTS_TARGET, preamble)
        .and_then(first_int)
        .unwrap_or(0);

    let spans = epic_spans(text, &epics);
    let epic_starts: Vec<usize> = epics.iter().map(|e| e.start).collect();
    let section_starts: Vec<usize> = SECTION_HEADING.find_iter(text).map(|m| m.start()).collect();

    let mut tasks = Vec::with_capacity(labels.len());
    let mut seen: HashMap<TaskId, usize> = HashMap::new();
    let mut anomalies = Vec::new();

    for (i, label) in labels.iter().enumerate() {
        let line = line_number(text, label.offset);
        if let Some(&first) = seen.get(&label.id) {
            return Err(MalformedDocument::DuplicateTaskId {
                id: label.id.clone(),
                first,
                second: line,
            });
        }
        seen.insert(label.id.clone(), line);

        let next_label = labels.get(i + 1).map_or(text.len(), |l| l.line_start);
        let next_epic = epic_starts
            .iter()
            .copied()
            .find(|&start| start > label.offset)
            .unwrap_or(text.len());
        let next_section = section_starts
            .iter()
            .copied()
            .find(|&start| start > label.line_end)
            .unwrap_or(text.len());
        let body_start = (label.line_end + 1).min(text.len());
        let body_end = next_label.min(next_epic).min(next_section).max(body_start);
        let body = &text[body_start..body_end];

        let (format, title) = classify_label_rest(label.rest);
        debug!(id = %label.id, title = %title, line, "found task");

        if label.id.sprint_number() != Some(number) {
            warn!(id = %label.id, line, sprint = number, "task id belongs to another sprint");
            anomalies.push(ExtractionAnomaly::SprintMismatch {
                id: label.id.clone(),
                line,
                expected: number,
            });
        }

        tasks.push(build_task(label, line, format, title, body, &name));
    }

    let resolution = resolve(tasks, spans, &name, &options.references);
    for orphan in &resolution.orphans {
        warn!(id = %orphan.id, line = orphan.line, "task is not inside any epic");
        anomalies.push(ExtractionAnomaly::OrphanTask {
            id: orphan.id.clone(),
            line: orphan.line,
        });
    }

    debug!(
        sprint = number,
        epics = resolution.epics.len(),
        tasks = labels.len(),
        "parsed sprint"
    );

    Ok(ParsedSprint {
        sprint: Sprint {
            number,
            name,
            layer_focus,
            duration,
            story_points_target,
            epics: resolution.epics,
        },
        orphans: resolution.orphans,
        anomalies,
    })
}

fn tokenize_labels(text: &str) -> Vec<LabelToken<'_>> {
    TASK_LABEL
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let marker = caps.get(1)?;
            let id = TaskId::new(caps.get(2)?.as_str(), caps.get(3)?.as_str());
            Some(LabelToken {
                line_start: whole.start(),
                offset: marker.start(),
                line_end: whole.end(),
                id,
                rest: caps.get(4).map_or("", |m| m.as_str()),
            })
        })
        .collect()
}

fn tokenize_epics(text: &str) -> Vec<EpicToken<'_>> {
    EPIC_HEADER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(EpicToken {
                start: whole.start(),
                header_end: whole.end(),
                number: caps.get(1)?.as_str(),
                name: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

/// Build contiguous spans: each epic ends where the next one starts.
fn epic_spans(text: &str, epics: &[EpicToken<'_>]) -> Vec<EpicSpan> {
    epics
        .iter()
        .enumerate()
        .map(|(i, epic)| {
            let end = epics.get(i + 1).map_or(text.len(), |next| next.start);
            let goal = extract_goal(&text[epic.header_end..end]);
            debug!(epic = epic.name, start = epic.start, end, "found epic");
            EpicSpan {
                number: epic.number.parse().unwrap_or(0),
                name: epic.name.trim().to_string(),
                goal,
                span: epic.start..end,
            }
        })
        .collect()
}

/// Goal from the `**Goal**:` line right after an epic header.
///
/// Continuation lines are joined with spaces up to a blank line, heading,
/// bold label, or task label.
fn extract_goal(after_header: &str) -> String {
    let mut lines = after_header.lines().skip(1).skip_while(|l| l.trim().is_empty());
    let Some(first) = lines.next() else {
        return String::new();
    };
    let Some(value) = label_value(&GOAL, first) else {
        return String::new();
    };

    let mut parts = vec![value.to_string()];
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("**")
            || TASK_LABEL.is_match(line)
        {
            break;
        }
        parts.push(trimmed.to_string());
    }
    parts.join(" ")
}

/// Classify the text after a `**T<d>.<d>**` marker into a label format and title.
fn classify_label_rest(rest: &str) -> (LabelFormat, String) {
    let rest = rest.trim();

    if let Some(title) = strip_separator(rest) {
        return (LabelFormat::Dashed, title_or_untitled(title));
    }

    if let Some(token) = rest.split_whitespace().next() {
        if Priority::from_glyph(token).is_some() {
            let after = rest[token.len()..].trim();
            let title = strip_separator(after).unwrap_or(after);
            return (LabelFormat::Glyph(token.to_string()), title_or_untitled(title));
        }
    }

    (LabelFormat::Bare, title_or_untitled(rest))
}

/// Strip a leading `-`, `–`, `—`, or `:` separator.
fn strip_separator(s: &str) -> Option<&str> {
    s.strip_prefix(|c: char| matches!(c, '-' | '–' | '—' | ':'))
        .map(str::trim)
}

fn title_or_untitled(title: &str) -> String {
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// `Database layer with PostgreSQL` -> `Database layer`.
fn strip_with_clause(value: &str) -> &str {
    match value.rfind(" with ") {
        Some(idx) if idx > 0 => value[..idx].trim(),
        _ => value,
    }
}

fn build_task(
    label: &LabelToken<'_>,
    line: usize,
    format: LabelFormat,
    title: String,
    body: &str,
    sprint: &str,
) -> Task {
    Task {
        id: label.id.clone(),
        title,
        body: body.to_string(),
        description: String::new(),
        story_points: extract_story_points(body),
        assignee: extract_assignee(body),
        duration: extract_duration(body),
        priority: extract_priority(format.glyph(), body),
        dependencies: extract_dependencies(body),
        acceptance_criteria: extract_acceptance_criteria(body),
        epic: None,
        sprint: sprint.to_string(),
        offset: label.offset,
        line,
        format,
    }
}

fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
