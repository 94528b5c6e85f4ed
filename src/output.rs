use std::time::Duration;

use sprint_import::color::{self, emoji};
use sprint_import::config::{self, Config};
use sprint_import::sync::RunReport;

/// Print a banner before publishing starts.
pub(crate) fn print_run_start_banner(config: &Config, documents: usize, tasks: usize) {
    println!();
    println!("=== {} {}: {} ===",
             emoji::ROCKET,
             color::label("STARTING IMPORT"),
             color::info(&config.project_key));
    println!();
    println!("  {} Sprints: {} from {}",
             emoji::FOLDER,
             color::number(documents),
             color::info(&config.sprints_dir));
    println!("  {} Tasks: {}", emoji::TASK, color::number(tasks));
    println!("  Pacing: {}s between tasks", config.delay_secs);
    println!();
}

/// Print the end-of-run status banner.
pub(crate) fn print_run_status_banner(report: &RunReport, elapsed: Duration) {
    let stats = &report.stats;
    let points = report
        .sprints
        .iter()
        .map(|s| s.points_created())
        .fold(0, u32::saturating_add);

    println!();
    println!("=== {} {} ===", emoji::CHART, color::label("IMPORT STATUS"));
    println!();
    println!("  {} Sprints processed: {}", emoji::SPRINT, color::number(stats.sprints_processed));
    println!("  {} {}: {} epics, {} tasks ({} story points)",
             emoji::CHECK,
             color::success("Created"),
             color::number(stats.epics_created),
             color::number(stats.tasks_created),
             color::number(points));
    println!("  {} {}: {} epics, {} tasks",
             emoji::CROSS,
             color::error("Failed"),
             color::number(stats.epics_failed),
             color::number(stats.tasks_failed));
    if stats.tasks_skipped > 0 {
        println!("  {} {}: {} tasks",
                 emoji::WARNING,
                 color::warning("Skipped"),
                 color::number(stats.tasks_skipped));
    }
    println!("  Elapsed: {}", color::info(&format_duration(elapsed)));
    println!();
    let marker = if report.status().is_acceptable() { emoji::PARTY } else { emoji::WARNING };
    println!("  {} Overall: {}", marker, color::status(report.status()));
    println!();
    println!("======================");
    println!();
}

pub(crate) fn print_help() {
    println!(
        r#"sprint-import - publish markdown sprint plans as Jira epics and tasks

USAGE:
    sprint-import [OPTIONS] [COMMAND]

COMMANDS:
    run                   Parse, preview, publish, and report (default)
    parse                 Parse and preview only (same as --dry-run)
    check                 Check Jira connectivity and project access
    projects              List the configured project registry
    status                Show recent run log lines
    init                  Write a default {config_file}

OPTIONS:
    -h, --help                Show this help message
    -V, --version             Show version
    -c, --config <PATH>       Path to config file [default: {config_file}]
    --jira-url <URL>          Jira site URL (env: ATLASSIAN_URL)
    --email <EMAIL>           Account email (env: ATLASSIAN_EMAIL)
    --api-token <TOKEN>       API token (env: ATLASSIAN_API_TOKEN)
    -p, --project-key <KEY>   Target project [default: {project_key}]
    -d, --sprints-dir <PATH>  Directory of sprint_*.md files [default: {dir}]
    --delay <SECS>            Pause after each task creation [default: {delay}]
    --sprint <N[,N...]>       Only import these sprint numbers (repeatable)
    --log-file <PATH>         Run log path [default: {log}]
    --link-parent             Nest tasks under their epic in Jira
    --dry-run                 Parse and preview without creating anything
    -v, --verbose             Debug diagnostics on stderr (RUST_LOG overrides)

A .env file in the working directory is loaded before anything else.

EXAMPLES:
    sprint-import check                   Verify credentials and project
    sprint-import parse -d plans/sprints  Preview what would be created
    sprint-import --sprint 1,2 run        Import sprints 1 and 2"#,
        config_file = config::DEFAULT_CONFIG_FILE,
        project_key = config::DEFAULT_PROJECT_KEY,
        dir = config::DEFAULT_SPRINTS_DIR,
        delay = config::DEFAULT_DELAY_SECS,
        log = config::DEFAULT_LOG_FILE,
    );
}

/// Format a duration in human-readable form.
fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;
    use std::time::Duration;

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_millis(900)), "0s");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
