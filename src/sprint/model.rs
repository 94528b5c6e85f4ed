use std::fmt;
use std::ops::Range;

/// Default sprint focus when no `**Focus**:` line is present.
pub const DEFAULT_FOCUS: &str = "Unknown";
/// Default sprint duration when no `**Duration**:` line is present.
pub const DEFAULT_SPRINT_DURATION: &str = "14 days";
/// Default task assignee.
pub const DEFAULT_ASSIGNEE: &str = "Unassigned";
/// Default task duration.
pub const DEFAULT_TASK_DURATION: &str = "Unknown";

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Highest,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Map a priority glyph to its level.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph.trim_end_matches('\u{fe0f}') {
            "🔴" | "🟠" => Some(Self::High),
            "🟡" => Some(Self::Medium),
            "🔵" | "🟢" => Some(Self::Low),
            _ => None,
        }
    }

    /// Parse a level name (case-insensitive) or a glyph.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(p) = Self::from_glyph(s) {
            return Some(p);
        }
        match s.to_lowercase().as_str() {
            "highest" => Some(Self::Highest),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highest => "Highest",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite task identifier `T<sprint>.<task>`.
///
/// The digit strings are kept verbatim so `T03.1` renders as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId {
    pub sprint: String,
    pub task: String,
}

impl TaskId {
    pub fn new(sprint: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            sprint: sprint.into(),
            task: task.into(),
        }
    }

    /// Parse `T<digits>.<digits>`.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix('T')?;
        let (sprint, task) = rest.split_once('.')?;
        let all_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
        if all_digits(sprint) && all_digits(task) {
            Some(Self::new(sprint, task))
        } else {
            None
        }
    }

    /// Sprint number encoded in the identifier, if it fits.
    pub fn sprint_number(&self) -> Option<u32> {
        self.sprint.parse().ok()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}.{}", self.sprint, self.task)
    }
}

/// Which historical label format a task line used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelFormat {
    /// `**T1.1** 🔴 Title`
    Glyph(String),
    /// `**T1.1** - Title`
    Dashed,
    /// `**T1.1** Title`
    Bare,
}

impl LabelFormat {
    pub fn glyph(&self) -> Option<&str> {
        match self {
            Self::Glyph(g) => Some(g),
            _ => None,
        }
    }
}

/// A single unit of planned work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Raw task body (everything after the label line).
    pub body: String,
    /// Render-ready description, synthesized once the epic is known.
    pub description: String,
    pub story_points: u32,
    pub assignee: String,
    pub duration: String,
    pub priority: Priority,
    pub dependencies: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    /// Owning epic name; `None` until resolution assigns one.
    pub epic: Option<String>,
    pub sprint: String,
    /// Byte offset of the label in the source document.
    pub offset: usize,
    /// 1-based line of the label in the source document.
    pub line: usize,
    pub format: LabelFormat,
}

/// A named group of tasks sharing a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epic {
    pub number: u32,
    pub name: String,
    pub goal: String,
    pub sprint: String,
    pub tasks: Vec<Task>,
    /// Byte span of the epic in the source document.
    pub span: Range<usize>,
}

impl Epic {
    pub fn story_points(&self) -> u32 {
        self.tasks
            .iter()
            .map(|t| t.story_points)
            .fold(0, u32::saturating_add)
    }
}

/// One parsed planning iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprint {
    pub number: u32,
    pub name: String,
    pub layer_focus: String,
    pub duration: String,
    pub story_points_target: u32,
    pub epics: Vec<Epic>,
}

impl Sprint {
    pub fn task_count(&self) -> usize {
        self.epics.iter().map(|e| e.tasks.len()).sum()
    }

    pub fn story_points(&self) -> u32 {
        self.epics
            .iter()
            .map(Epic::story_points)
            .fold(0, u32::saturating_add)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.epics.iter().flat_map(|e| e.tasks.iter())
    }
}
