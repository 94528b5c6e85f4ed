use sprint_import::color::{self, emoji};
use sprint_import::config::{self, Config};
use sprint_import::report;

/// List the configured project registry.
pub fn cmd_projects(config: &Config) -> Result<(), String> {
    if config.projects.is_empty() {
        println!(
            "No projects configured. Add [projects.<KEY>] sections to {}.",
            config::DEFAULT_CONFIG_FILE
        );
        println!("Active project key: {}", color::key(&config.project_key));
        return Ok(());
    }

    println!("{} {}", emoji::TASK, report::project_table(&config.projects, &config.project_key));

    if config.project(&config.project_key).is_none() {
        println!();
        println!(
            "{} Active project {} is not in the registry",
            emoji::WARNING,
            color::key(&config.project_key)
        );
    }
    Ok(())
}
