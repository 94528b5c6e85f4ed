use std::path::Path;

use tracing::warn;

use sprint_import::color::{self, emoji};
use sprint_import::config::Config;
use sprint_import::log::RunLogger;
use sprint_import::report;
use sprint_import::sprint::ParseOptions;
use sprint_import::sync::{self, DocumentSet, Orchestrator, SyncOptions};
use sprint_import::tracker::StubPublisher;

/// Parse and preview sprint documents without touching the tracker.
pub fn cmd_parse(config: &Config) -> Result<(), String> {
    let set = load_and_preview(config)?;

    // Account against the stub so the dry run reports the same numbers a
    // real import would attempt.
    let mut orchestrator = Orchestrator::new(
        StubPublisher::new(config.project_key.as_str()),
        SyncOptions::default(),
    );
    let report = orchestrator.run(&set);

    let logger = RunLogger::new(&config.log_file);
    let summary = format!(
        "dry run: would create {} epics, {} tasks from {} sprints",
        report.stats.epics_created, report.stats.tasks_created, report.stats.sprints_processed
    );
    if let Err(e) = logger
        .log_session_start(&config.project_key, true)
        .and_then(|_| logger.log("run", &summary))
    {
        warn!(path = %config.log_file, error = %e, "failed to write run log");
    }

    println!(
        "{} {}: would create {} epics and {} tasks in {}",
        emoji::CHECK,
        color::label("Dry run"),
        color::number(report.stats.epics_created),
        color::number(report.stats.tasks_created),
        color::key(&config.project_key)
    );
    Ok(())
}

/// Load every sprint document and print its preview plus the creation summary.
///
/// Errors when the directory is unreadable or no document parsed.
pub(crate) fn load_and_preview(config: &Config) -> Result<DocumentSet, String> {
    let options = ParseOptions {
        references: config.references.clone(),
    };
    let dir = Path::new(&config.sprints_dir);

    println!(
        "{} {} {}",
        emoji::FOLDER,
        color::label("Reading sprints from"),
        color::info(&config.sprints_dir)
    );
    let set = sync::load_documents(dir, &config.sprint_filter, &options)
        .map_err(|e| e.to_string())?;

    for failure in &set.failed {
        println!("  {} {}", emoji::WARNING, color::warning(&failure.to_string()));
    }

    if set.is_empty() {
        return Err(format!("no parseable sprint documents in {}", config.sprints_dir));
    }

    for doc in &set.documents {
        println!();
        println!("{}", report::sprint_preview(doc));
        for anomaly in &doc.parsed.anomalies {
            println!("  {} {}", emoji::WARNING, color::warning(&anomaly.to_string()));
        }
    }

    println!();
    println!("{}", report::creation_summary(&set.documents));
    println!();
    Ok(set)
}
