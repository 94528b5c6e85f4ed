use std::env;
use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

use sprint_import::config::{self, Command, Config};

mod commands;
mod output;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    // A missing .env is normal; everything it sets can come from elsewhere.
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let cli = config::parse_args(args);

    if cli.help {
        output::print_help();
        return;
    }

    if cli.version {
        println!("sprint-import {}", VERSION);
        return;
    }

    if let Some(ref unknown) = cli.unknown_command {
        eprintln!("error: unknown command '{}'", unknown);
        eprintln!("Run 'sprint-import --help' for usage.");
        process::exit(1);
    }

    if let Some(ref delay) = cli.invalid_delay {
        eprintln!("error: invalid --delay value '{}'", delay);
        eprintln!("Run 'sprint-import --help' for usage.");
        process::exit(1);
    }

    init_tracing(cli.verbose);

    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    // Default command is Run if none specified
    let command = cli.command.unwrap_or(Command::Run);

    let result = match command {
        Command::Run => commands::cmd_run(&config),
        Command::Parse => commands::cmd_parse(&config),
        Command::Check => commands::cmd_check(&config),
        Command::Projects => commands::cmd_projects(&config),
        Command::Status => commands::cmd_status(&config),
        Command::Init => commands::cmd_init(),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// Diagnostics go to stderr: `warn` by default, `debug` with `--verbose`.
/// `RUST_LOG` takes precedence over both.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
