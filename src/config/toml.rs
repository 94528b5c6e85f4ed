use std::fs;
use std::path::Path;

use super::types::{Config, ConfigError, ProjectInfo};

pub(super) fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    parse_toml(&content)
}

pub(super) fn parse_toml(content: &str) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut current_section = String::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Section headers like [jira] or [projects.SCRUM]
        if line.starts_with('[') && line.ends_with(']') {
            current_section = line[1..line.len() - 1].trim().to_string();
            if let Some(key) = current_section.strip_prefix("projects.") {
                project_entry(&mut config, key);
            }
            continue;
        }

        let Some((key, value)) = parse_toml_line(line) else {
            continue;
        };

        if let Some(project_key) = current_section.strip_prefix("projects.") {
            let entry = project_entry(&mut config, project_key);
            match key {
                "name" => entry.name = unquote(value),
                "description" => entry.description = unquote(value),
                "board_id" => entry.board_id = Some(unquote(value)),
                _ => {}
            }
            continue;
        }

        let full_key = if current_section.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", current_section, key)
        };

        match full_key.as_str() {
            "jira.url" => config.jira_url = Some(unquote(value)),
            "jira.email" => config.jira_email = Some(unquote(value)),
            "jira.api_token" => config.jira_api_token = Some(unquote(value)),
            "jira.project_key" => config.project_key = unquote(value),
            "jira.link_parent" => config.link_parent = parse_bool(&full_key, value)?,
            "jira.timeout" => {
                config.timeout_secs = value
                    .parse()
                    .map_err(|_| ConfigError::Parse(format!("invalid jira.timeout: {}", value)))?;
            }
            "sources.dir" => config.sprints_dir = unquote(value),
            "sync.delay" => {
                config.delay_secs = value
                    .parse()
                    .ok()
                    .filter(|d: &f64| d.is_finite() && *d >= 0.0)
                    .ok_or_else(|| ConfigError::Parse(format!("invalid sync.delay: {}", value)))?;
            }
            "log.file" => config.log_file = unquote(value),
            "description.references" => config.references = parse_string_array(&full_key, value)?,
            _ => {} // Ignore unknown keys
        }
    }

    Ok(config)
}

fn project_entry<'a>(config: &'a mut Config, key: &str) -> &'a mut ProjectInfo {
    let key = key.trim().trim_matches('"');
    let idx = match config.projects.iter().position(|p| p.key == key) {
        Some(idx) => idx,
        None => {
            config.projects.push(ProjectInfo {
                key: key.to_string(),
                ..Default::default()
            });
            config.projects.len() - 1
        }
    };
    &mut config.projects[idx]
}

/// Parse a TOML line into key-value pair, dropping a trailing comment.
fn parse_toml_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), strip_comment(value.trim())))
}

/// Cut a `# comment` that is not inside a quoted string.
fn strip_comment(value: &str) -> &str {
    let mut in_string = false;
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return value[..i].trim_end(),
            _ => {}
        }
    }
    value
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match unquote(value).to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::Parse(format!("invalid {}: {}", key, value))),
    }
}

/// Parse `["a", "b"]` into its strings.
fn parse_string_array(key: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| ConfigError::Parse(format!("invalid {}: {}", key, value)))?;

    Ok(inner
        .split(',')
        .map(unquote)
        .filter(|s| !s.is_empty())
        .collect())
}
