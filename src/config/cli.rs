/// CLI arguments parsed from command line.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Subcommand to execute.
    pub command: Option<Command>,
    /// First positional argument that is not a known command.
    pub unknown_command: Option<String>,
    /// Path to config file.
    pub config: Option<String>,
    /// Jira site URL.
    pub jira_url: Option<String>,
    /// Account email.
    pub email: Option<String>,
    /// API token.
    pub api_token: Option<String>,
    /// Target project key.
    pub project_key: Option<String>,
    /// Directory holding sprint files.
    pub sprints_dir: Option<String>,
    /// Pause between task creations, in seconds.
    pub delay: Option<f64>,
    /// `--delay` value that is not a non-negative number of seconds.
    pub invalid_delay: Option<String>,
    /// Sprint numbers to import.
    pub sprints: Vec<u32>,
    /// Run log path.
    pub log_file: Option<String>,
    /// Parse and preview only.
    pub dry_run: bool,
    /// Nest tasks under their epic.
    pub link_parent: bool,
    /// Debug diagnostics.
    pub verbose: bool,
    /// Show help.
    pub help: bool,
    /// Show version.
    pub version: bool,
}

/// sprint-import subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Parse, preview, publish, report.
    Run,
    /// Parse and preview only.
    Parse,
    /// Check connectivity and project access.
    Check,
    /// List the configured project registry.
    Projects,
    /// Show recent run log lines.
    Status,
    /// Write a default config file.
    Init,
}

impl Command {
    /// Parse command from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "run" => Some(Self::Run),
            "parse" => Some(Self::Parse),
            "check" => Some(Self::Check),
            "projects" => Some(Self::Projects),
            "status" => Some(Self::Status),
            "init" => Some(Self::Init),
            _ => None,
        }
    }
}

/// Parse a `1,3,5` sprint list. Entries that are not numbers are dropped.
pub fn parse_sprint_list(s: &str) -> Vec<u32> {
    s.split(',').filter_map(|part| part.trim().parse().ok()).collect()
}

/// Parse CLI arguments from an iterator.
pub fn parse_args<I>(args: I) -> CliArgs
where
    I: IntoIterator<Item = String>,
{
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();

    // Skip program name
    args.next();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => cli.help = true,
            "-V" | "--version" => cli.version = true,
            "-c" | "--config" => cli.config = args.next(),
            "--jira-url" => cli.jira_url = args.next(),
            "--email" => cli.email = args.next(),
            "--api-token" => cli.api_token = args.next(),
            "-p" | "--project-key" => cli.project_key = args.next(),
            "-d" | "--sprints-dir" => cli.sprints_dir = args.next(),
            "--delay" => {
                if let Some(value) = args.next() {
                    match value.trim().parse::<f64>() {
                        Ok(secs) if secs.is_finite() && secs >= 0.0 => cli.delay = Some(secs),
                        _ => cli.invalid_delay = Some(value),
                    }
                }
            }
            "--sprint" => {
                if let Some(list) = args.next() {
                    cli.sprints.extend(parse_sprint_list(&list));
                }
            }
            "--log-file" => cli.log_file = args.next(),
            "--dry-run" => cli.dry_run = true,
            "--link-parent" => cli.link_parent = true,
            "-v" | "--verbose" => cli.verbose = true,
            _ if !arg.starts_with('-') && cli.command.is_none() && cli.unknown_command.is_none() => {
                match Command::from_str(&arg) {
                    Some(command) => cli.command = Some(command),
                    None => cli.unknown_command = Some(arg),
                }
            }
            _ => {} // Ignore unknown flags
        }
    }

    cli
}
