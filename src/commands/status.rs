use std::path::Path;

use sprint_import::color::{self, emoji};
use sprint_import::config::Config;
use sprint_import::log::RunLogger;

/// Number of run log lines shown.
const RECENT_LINES: usize = 15;

/// Show the tail of the run log.
pub fn cmd_status(config: &Config) -> Result<(), String> {
    println!("{} {} ({}):", emoji::CHART, color::label("Recent Runs"), config.log_file);

    if !Path::new(&config.log_file).exists() {
        println!("  (no run log yet)");
        return Ok(());
    }

    let logger = RunLogger::new(&config.log_file);
    let lines = logger
        .read_recent(RECENT_LINES)
        .map_err(|e| format!("failed to read {}: {}", config.log_file, e))?;

    if lines.is_empty() {
        println!("  (empty)");
    }
    for line in lines {
        println!("  {}", color::log_line(&line));
    }
    Ok(())
}
