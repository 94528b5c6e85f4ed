//! Terminal color utilities using ANSI escape codes.
//!
//! Provides colored output for issue keys, priorities, run statuses, and
//! run log lines.

use crate::sprint::Priority;
use crate::sync::RunStatus;

/// ANSI color codes
pub mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";

    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

use codes::*;

/// Color an issue key (bold magenta).
pub fn key(text: &str) -> String {
    format!("{}{}{}{}", BOLD, MAGENTA, text, RESET)
}

/// Dim text, for secondary details.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", DIM, text, RESET)
}

/// Color success messages (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", GREEN, text, RESET)
}

/// Color error messages (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", RED, text, RESET)
}

/// Color warning messages (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", YELLOW, text, RESET)
}

/// Color info messages (cyan).
pub fn info(text: &str) -> String {
    format!("{}{}{}", CYAN, text, RESET)
}

/// Color a label (bold).
pub fn label(text: &str) -> String {
    format!("{}{}{}", BOLD, text, RESET)
}

/// Color a number/count (bright cyan).
pub fn number(n: impl std::fmt::Display) -> String {
    format!("{}{}{}", BRIGHT_CYAN, n, RESET)
}

/// Color a priority by urgency.
pub fn priority(p: Priority) -> String {
    let color = match p {
        Priority::Highest => BRIGHT_RED,
        Priority::High => RED,
        Priority::Medium => YELLOW,
        Priority::Low => BLUE,
    };
    format!("{}{}{}", color, p, RESET)
}

/// Color a run status: green when acceptable, yellow for partial, red otherwise.
pub fn status(s: RunStatus) -> String {
    let color = match s {
        RunStatus::Success | RunStatus::MostlySuccess => GREEN,
        RunStatus::PartialSuccess => YELLOW,
        RunStatus::MostlyFailed | RunStatus::Failed => RED,
    };
    format!("{}{}{}{}", BOLD, color, s, RESET)
}

/// Colorize a run log line in the format: "timestamp | scope | message".
/// Dims the timestamp, bolds the scope, and highlights "created" (green)
/// and "failed"/"skipped" (red/yellow) in the message.
pub fn log_line(line: &str) -> String {
    let parts: Vec<&str> = line.splitn(3, " | ").collect();
    if parts.len() != 3 {
        return line.to_string();
    }

    let message = parts[2];
    let colored_message = if message.contains("failed") {
        message.replace("failed", &format!("{}{}failed{}", BOLD, RED, RESET))
    } else if message.contains("skipped") {
        message.replace("skipped", &format!("{}skipped{}", YELLOW, RESET))
    } else if message.contains("created") {
        message.replace("created", &format!("{}created{}", GREEN, RESET))
    } else {
        message.to_string()
    };

    format!("{} | {} | {}", dim(parts[0]), label(parts[1]), colored_message)
}

/// Emoji constants for consistent usage
pub mod emoji {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARNING: &str = "⚠️";
    pub const SPRINT: &str = "🏃";
    pub const TASK: &str = "📋";
    pub const FOLDER: &str = "📁";
    pub const LINK: &str = "🔗";
    pub const CHART: &str = "📊";
    pub const PARTY: &str = "🎉";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bold() {
        let text = key("SCRUM-1");
        assert!(text.contains("SCRUM-1"));
        assert!(text.contains(BOLD));
        assert!(text.ends_with(RESET));
    }

    #[test]
    fn test_priority_colors() {
        assert!(priority(Priority::High).contains(RED));
        assert!(priority(Priority::Low).contains(BLUE));
        assert!(priority(Priority::Medium).contains("Medium"));
    }

    #[test]
    fn test_status_colors() {
        assert!(status(RunStatus::Success).contains(GREEN));
        assert!(status(RunStatus::MostlySuccess).contains(GREEN));
        assert!(status(RunStatus::PartialSuccess).contains(YELLOW));
        assert!(status(RunStatus::Failed).contains(RED));
        assert!(status(RunStatus::Failed).contains("FAILED"));
    }

    #[test]
    fn test_log_line_created() {
        let line = "2026-01-26 00:01:26 | T1.1 | created as SCRUM-2 under SCRUM-1";
        let colored = log_line(line);
        assert!(colored.contains(GREEN), "created should be green");
        assert!(colored.contains("T1.1"));
        assert!(colored.contains(DIM), "timestamp should be dim");
    }

    #[test]
    fn test_log_line_failed() {
        let line = "2026-01-26 00:01:26 | sprint 1 | epic Setup failed: HTTP 400: bad";
        let colored = log_line(line);
        assert!(colored.contains(RED));
    }

    #[test]
    fn test_log_line_invalid_format() {
        let line = "\n=== import into SCRUM ===";
        assert_eq!(log_line(line), line);
    }
}
