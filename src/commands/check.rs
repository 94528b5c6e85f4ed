use sprint_import::color::{self, emoji};
use sprint_import::config::Config;
use sprint_import::tracker::JiraClient;

/// Check connectivity and project access.
pub fn cmd_check(config: &Config) -> Result<(), String> {
    connect(config)?;
    println!("{} {}", emoji::CHECK, color::success("Jira connection ready"));
    Ok(())
}

/// Build a Jira client and verify the credentials and project before use.
pub(crate) fn connect(config: &Config) -> Result<JiraClient, String> {
    let settings = config.jira_settings().map_err(|e| e.to_string())?;
    println!(
        "{} {} {}",
        emoji::LINK,
        color::label("Connecting to"),
        color::info(&settings.base_url)
    );

    let client = JiraClient::new(settings).map_err(|e| e.to_string())?;

    let user = client
        .myself()
        .map_err(|e| format!("Jira connection failed: {}", e))?;
    println!("  Authenticated as: {}", color::info(&user));

    let project = client
        .project(&config.project_key)
        .map_err(|e| format!("cannot access project {}: {}", config.project_key, e))?;
    println!(
        "  Project: {} ({})",
        color::key(&config.project_key),
        project
    );

    Ok(client)
}
