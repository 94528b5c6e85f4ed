use std::env;

use super::types::Config;

pub(super) fn apply_env(config: &mut Config) {
    apply_env_from(config, |key| env::var(key).ok());
}

/// Apply variables from `lookup`. Empty values are ignored.
pub(super) fn apply_env_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(val) = var("ATLASSIAN_URL") {
        config.jira_url = Some(val);
    }
    if let Some(val) = var("ATLASSIAN_EMAIL") {
        config.jira_email = Some(val);
    }
    if let Some(val) = var("ATLASSIAN_API_TOKEN") {
        config.jira_api_token = Some(val);
    }
    if let Some(val) = var("JIRA_PROJECT_KEY") {
        config.project_key = val;
    }
    if let Some(val) = var("SPRINTS_DIRECTORY") {
        config.sprints_dir = val;
    }
    if let Some(val) = var("RATE_LIMIT_DELAY") {
        if let Ok(secs) = val.trim().parse::<f64>() {
            if secs.is_finite() && secs >= 0.0 {
                config.delay_secs = secs;
            }
        }
    }
    if let Some(val) = var("SPRINT_IMPORT_LOG_FILE") {
        config.log_file = val;
    }
}
