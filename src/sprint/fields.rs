//! Field extractors for task bodies.
//!
//! Every extractor is total: a missing or unparseable labeled line yields the
//! documented default. Labels are matched as `**Label**:` or `**Label:**`,
//! case-insensitively, optionally behind a list bullet.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{Priority, DEFAULT_ASSIGNEE, DEFAULT_TASK_DURATION};

/// Build the regex for a bold-labeled line. Group 1 is the rest of the line.
pub(super) fn labeled_line(label: &str) -> Regex {
    let pattern = format!(
        r"(?mi)^[ \t]*(?:[-*+][ \t]+)?\*\*{}(?:\*\*[ \t]*:|[ \t]*:\*\*)[ \t]*(.*)$",
        regex::escape(label)
    );
    Regex::new(&pattern).expect("label is escaped")
}

static STORY_POINTS: Lazy<Regex> = Lazy::new(|| labeled_line("Story Points"));
static ASSIGNEE: Lazy<Regex> = Lazy::new(|| labeled_line("Assignee"));
static DURATION: Lazy<Regex> = Lazy::new(|| labeled_line("Duration"));
static PRIORITY: Lazy<Regex> = Lazy::new(|| labeled_line("Priority"));
static DEPENDENCIES: Lazy<Regex> = Lazy::new(|| labeled_line("Dependencies"));
static ACCEPTANCE: Lazy<Regex> = Lazy::new(|| labeled_line("Acceptance Criteria"));

static UNCHECKED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[-*+][ \t]+\[ \][ \t]+(\S.*)$").unwrap());
static BOLD_LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:[-*+][ \t]+)?\*\*[^*\n]+\*\*").unwrap());
static FIRST_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Value of the first line carrying `re`'s label, trimmed. Empty values count as absent.
pub(super) fn label_value<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
}

/// First unsigned integer in `value`, if it fits in a `u32`.
pub(super) fn first_int(value: &str) -> Option<u32> {
    FIRST_INT.find(value).and_then(|m| m.as_str().parse().ok())
}

pub fn extract_story_points(body: &str) -> u32 {
    label_value(&STORY_POINTS, body).and_then(first_int).unwrap_or(0)
}

pub fn extract_assignee(body: &str) -> String {
    label_value(&ASSIGNEE, body)
        .unwrap_or(DEFAULT_ASSIGNEE)
        .to_string()
}

pub fn extract_duration(body: &str) -> String {
    label_value(&DURATION, body)
        .unwrap_or(DEFAULT_TASK_DURATION)
        .to_string()
}

/// Resolve a task's priority.
///
/// A glyph (from the label line, or leading the body) wins over a
/// `**Priority**:` line; with neither, the level is `Medium`.
pub fn extract_priority(glyph: Option<&str>, body: &str) -> Priority {
    if let Some(p) = glyph.or_else(|| leading_token(body)).and_then(Priority::from_glyph) {
        return p;
    }

    label_value(&PRIORITY, body)
        .and_then(|value| {
            Priority::parse(value)
                .or_else(|| value.split_whitespace().next().and_then(Priority::parse))
        })
        .unwrap_or_default()
}

fn leading_token(body: &str) -> Option<&str> {
    body.split_whitespace().next()
}

pub fn extract_dependencies(body: &str) -> Vec<String> {
    match label_value(&DEPENDENCIES, body) {
        Some(value) => parse_dependency_list(value),
        None => Vec::new(),
    }
}

/// Split a dependency value on commas. `none` in any case means no dependencies.
pub fn parse_dependency_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|dep| !dep.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect unchecked checklist items from the acceptance criteria section.
///
/// The section runs from the label to the next bold-labeled line or the end
/// of the body. Checked items and lines that are not checklist items are skipped.
pub fn extract_acceptance_criteria(body: &str) -> Vec<String> {
    let Some(caps) = ACCEPTANCE.captures(body) else {
        return Vec::new();
    };
    let mut criteria = Vec::new();

    // An item may sit on the label line itself.
    if let Some(inline) = caps.get(1) {
        if let Some(item) = unchecked_item(inline.as_str()) {
            criteria.push(item);
        }
    }

    let section_start = caps.get(0).map_or(body.len(), |m| m.end());
    for line in body[section_start..].lines() {
        if BOLD_LABEL_LINE.is_match(line) {
            break;
        }
        if let Some(item) = unchecked_item(line) {
            criteria.push(item);
        }
    }

    criteria
}

fn unchecked_item(line: &str) -> Option<String> {
    UNCHECKED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
