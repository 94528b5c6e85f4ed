use std::time::Instant;

use tracing::warn;

use sprint_import::color::{self, emoji};
use sprint_import::config::Config;
use sprint_import::log::RunLogger;
use sprint_import::report;
use sprint_import::sync::{Orchestrator, SyncOptions};

use super::check::connect;
use super::parse::{cmd_parse, load_and_preview};
use crate::output::{print_run_start_banner, print_run_status_banner};

/// Parse, preview, publish, and report.
///
/// Fails when the run classifies worse than mostly successful.
pub fn cmd_run(config: &Config) -> Result<(), String> {
    if config.dry_run {
        return cmd_parse(config);
    }

    let client = connect(config)?;
    println!();
    let set = load_and_preview(config)?;

    let logger = RunLogger::new(&config.log_file);
    if let Err(e) = logger.log_session_start(&config.project_key, false) {
        warn!(path = %config.log_file, error = %e, "failed to write run log");
    }

    print_run_start_banner(config, set.documents.len(), set.total_tasks());

    let options = SyncOptions {
        pacing: config.pacing(),
        echo: true,
    };
    let mut orchestrator = Orchestrator::new(client, options).with_logger(logger);

    let started = Instant::now();
    let run = orchestrator.run(&set);

    println!();
    println!("{}", report::validation_report(&run.stats));
    println!();
    println!("{}", color::label("Recommendations:"));
    for line in report::recommendations(&run.stats) {
        println!("  - {}", line);
    }

    print_run_status_banner(&run, started.elapsed());
    println!("{} Run log: {}", emoji::TASK, config.log_file);

    let status = run.status();
    if status.is_acceptable() {
        Ok(())
    } else {
        Err(format!("import finished with status {}", status))
    }
}
