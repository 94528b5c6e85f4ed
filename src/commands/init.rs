use std::fs;
use std::path::Path;

use sprint_import::config::{self, Config};

/// Write a default config file into the working directory.
pub fn cmd_init() -> Result<(), String> {
    let path = Path::new(config::DEFAULT_CONFIG_FILE);
    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    fs::write(path, Config::default_toml())
        .map_err(|e| format!("failed to create {}: {}", path.display(), e))?;
    println!("Created {}", path.display());
    println!("  Set credentials in .env (ATLASSIAN_URL, ATLASSIAN_EMAIL, ATLASSIAN_API_TOKEN)");
    println!("  or in the [jira] section, then run 'sprint-import check'.");
    Ok(())
}
