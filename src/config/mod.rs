//! Configuration loading for sprint-import.
//!
//! Supports sprint-import.toml, CLI flags, and environment variables.
//! Precedence (highest to lowest): CLI flags > env vars > config file > defaults.

mod cli;
mod env;
mod toml;
mod types;

pub use cli::{parse_args, parse_sprint_list, CliArgs, Command};
pub use types::{
    Config, ConfigError, ProjectInfo, DEFAULT_CONFIG_FILE, DEFAULT_DELAY_SECS, DEFAULT_LOG_FILE,
    DEFAULT_PROJECT_KEY, DEFAULT_SPRINTS_DIR, DEFAULT_TIMEOUT_SECS,
};
