use std::fs;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use super::*;
use crate::sprint::parse_sprint;
use crate::testutil::sprint_dir;
use crate::tracker::{PublishCall, StubPublisher};

const SPRINT_ONE: &str = "\
# Sprint 1: Foundation
### Epic 1: Setup
**Goal**: Bootstrap
**T1.1** - Init DB
**Story Points**: 3
**T1.2** - Init Cache
**Story Points**: 2

### Epic 2: Auth
**Goal**: Sign-in
**T1.3** - Login form
**Story Points**: 5
";

const SPRINT_TWO: &str = "\
# Sprint 2: Growth
**T2.9** - Stray task
### Epic 1: Metrics
**Goal**: Measure
**T2.1** - Counters
";

fn quiet() -> SyncOptions {
    SyncOptions::default()
}

#[test]
fn test_publish_sprint_all_created() {
    let parsed = parse_sprint(SPRINT_ONE).unwrap();
    let mut orch = Orchestrator::new(StubPublisher::new("SCRUM"), quiet());

    let outcome = orch.publish_sprint(&parsed);

    assert_eq!(outcome.number, 1);
    assert_eq!(outcome.epics.len(), 2);
    assert_eq!(outcome.epics_created(), 2);
    assert_eq!(outcome.tasks_created(), 3);
    assert_eq!(outcome.points_created(), 10);
    assert_eq!(
        outcome.epics[0].status,
        EpicStatus::Created(RemoteId::new("SCRUM-1"))
    );

    let stats = orch.stats();
    assert_eq!(stats.sprints_processed, 1);
    assert_eq!(stats.epics_created, 2);
    assert_eq!(stats.tasks_created, 3);
    assert_eq!(stats.status(), RunStatus::Success);
}

#[test]
fn test_points_created_saturate() {
    let doc = "\
# Sprint 1: Big
### Epic 1: E
**Goal**: g
**T1.1** - One
**Story Points**: 4000000000
### Epic 2: F
**Goal**: h
**T1.2** - Two
**Story Points**: 4000000000
";
    let parsed = parse_sprint(doc).unwrap();
    let mut orch = Orchestrator::new(StubPublisher::new("SCRUM"), quiet());

    let outcome = orch.publish_sprint(&parsed);

    assert_eq!(outcome.epics[0].points_created(), 4_000_000_000);
    assert_eq!(outcome.points_created(), u32::MAX);
}

#[test]
fn test_epic_created_before_its_tasks() {
    let parsed = parse_sprint(SPRINT_ONE).unwrap();
    let mut orch = Orchestrator::new(StubPublisher::new("SCRUM"), quiet());
    orch.publish_sprint(&parsed);

    let calls = orch.publisher().calls();
    assert_eq!(
        calls,
        vec![
            PublishCall::Epic { sprint: 1, name: "Setup".to_string() },
            PublishCall::Task { id: "T1.1".to_string(), parent: "SCRUM-1".to_string() },
            PublishCall::Task { id: "T1.2".to_string(), parent: "SCRUM-1".to_string() },
            PublishCall::Epic { sprint: 1, name: "Auth".to_string() },
            PublishCall::Task { id: "T1.3".to_string(), parent: "SCRUM-4".to_string() },
        ]
    );
}

#[test]
fn test_failed_epic_skips_children() {
    let parsed = parse_sprint(SPRINT_ONE).unwrap();
    let stub = StubPublisher::new("SCRUM").fail_epic("Setup");
    let mut orch = Orchestrator::new(stub, quiet());

    let outcome = orch.publish_sprint(&parsed);

    assert!(matches!(outcome.epics[0].status, EpicStatus::Failed(_)));
    for task in &outcome.epics[0].tasks {
        assert_eq!(task.status, TaskStatus::SkippedNoEpic);
    }
    assert!(matches!(outcome.epics[1].status, EpicStatus::Created(_)));

    // No create_task call is made for the failed epic's children.
    let task_calls: Vec<_> = orch
        .publisher()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, PublishCall::Task { .. }))
        .collect();
    assert_eq!(
        task_calls,
        vec![PublishCall::Task { id: "T1.3".to_string(), parent: "SCRUM-1".to_string() }]
    );

    let stats = orch.stats();
    assert_eq!(stats.epics_failed, 1);
    assert_eq!(stats.tasks_skipped, 2);
    assert_eq!(stats.tasks_attempted(), 1);
    assert_eq!(stats.status(), RunStatus::Success);
}

#[test]
fn test_task_failures_classify_run() {
    let parsed = parse_sprint(SPRINT_ONE).unwrap();
    let stub = StubPublisher::new("SCRUM").fail_task("T1.2").fail_task("T1.3");
    let mut orch = Orchestrator::new(stub, quiet());

    let outcome = orch.publish_sprint(&parsed);

    assert!(matches!(outcome.epics[0].tasks[1].status, TaskStatus::Failed(_)));
    assert_eq!(outcome.points_created(), 3);
    assert_eq!(orch.stats().tasks_failed, 2);
    assert_eq!(orch.stats().status(), RunStatus::MostlyFailed);
}

#[test]
fn test_pacing_after_each_task_attempt() {
    let parsed = parse_sprint(SPRINT_ONE).unwrap();
    let stub = StubPublisher::new("SCRUM").fail_task("T1.1");
    let options = SyncOptions {
        pacing: Duration::from_millis(20),
        echo: false,
    };
    let mut orch = Orchestrator::new(stub, options);

    let start = Instant::now();
    orch.publish_sprint(&parsed);

    // Three task attempts, failed ones included.
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[test]
fn test_no_pacing_for_skipped_tasks() {
    let doc = "# Sprint 1: A\n### Epic 1: E\n**Goal**: g\n**T1.1** - x\n**T1.2** - y\n";
    let parsed = parse_sprint(doc).unwrap();
    let options = SyncOptions {
        pacing: Duration::from_secs(5),
        echo: false,
    };
    let mut orch = Orchestrator::new(StubPublisher::new("S").fail_epic("E"), options);

    let start = Instant::now();
    orch.publish_sprint(&parsed);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_anomalies_counted_orphans_not_published() {
    let parsed = parse_sprint(SPRINT_TWO).unwrap();
    let mut orch = Orchestrator::new(StubPublisher::new("SCRUM"), quiet());

    let outcome = orch.publish_sprint(&parsed);

    assert_eq!(outcome.anomalies.len(), 1);
    assert_eq!(orch.stats().anomalies, 1);
    assert!(!orch
        .publisher()
        .calls()
        .iter()
        .any(|c| matches!(c, PublishCall::Task { id, .. } if id == "T2.9")));
}

#[test]
fn test_discover_sprint_files() {
    let dir = sprint_dir(&[
        ("sprint_2.md", SPRINT_TWO),
        ("sprint_1.md", SPRINT_ONE),
        ("notes.md", "# Sprint 9: Not a sprint file"),
        ("sprint_3.txt", SPRINT_ONE),
    ]);
    fs::create_dir(dir.path().join("sprint_dir.md")).unwrap();

    let files = discover_sprint_files(dir.path()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["sprint_1.md", "sprint_2.md"]);
}

#[test]
fn test_discover_missing_dir() {
    let dir = TempDir::new().unwrap();
    let err = discover_sprint_files(&dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, DocumentError::Io { .. }));
}

#[test]
fn test_load_documents_orders_by_sprint_number() {
    let dir = sprint_dir(&[("sprint_b.md", SPRINT_ONE), ("sprint_a.md", SPRINT_TWO)]);

    let set = load_documents(dir.path(), &[], &ParseOptions::default()).unwrap();
    let numbers: Vec<u32> = set.documents.iter().map(|d| d.parsed.sprint.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert!(set.failed.is_empty());
    assert_eq!(set.total_tasks(), 5);
}

#[test]
fn test_load_documents_skips_malformed_and_duplicates() {
    let dir = sprint_dir(&[
        ("sprint_1.md", SPRINT_ONE),
        ("sprint_1_copy.md", SPRINT_ONE),
        ("sprint_9.md", "no header"),
    ]);

    let set = load_documents(dir.path(), &[], &ParseOptions::default()).unwrap();
    assert_eq!(set.documents.len(), 1);
    assert_eq!(set.failed.len(), 2);
    assert!(set.failed.iter().any(|e| matches!(
        e,
        DocumentError::DuplicateSprint { number: 1, path, .. } if path.ends_with("sprint_1_copy.md")
    )));
    assert!(set
        .failed
        .iter()
        .any(|e| matches!(e, DocumentError::Malformed { .. })));
}

#[test]
fn test_load_documents_filter() {
    let dir = sprint_dir(&[("sprint_1.md", SPRINT_ONE), ("sprint_2.md", SPRINT_TWO)]);

    let set = load_documents(dir.path(), &[2], &ParseOptions::default()).unwrap();
    assert_eq!(set.documents.len(), 1);
    assert_eq!(set.documents[0].parsed.sprint.number, 2);
}

#[test]
fn test_run_aggregates_and_logs() {
    let dir = sprint_dir(&[
        ("sprint_1.md", SPRINT_ONE),
        ("sprint_2.md", SPRINT_TWO),
        ("sprint_3.md", "broken"),
    ]);
    let set = load_documents(dir.path(), &[], &ParseOptions::default()).unwrap();

    let log_path = dir.path().join("logs").join("run.log");
    let mut orch =
        Orchestrator::new(StubPublisher::new("SCRUM"), quiet()).with_logger(RunLogger::new(&log_path));
    let report = orch.run(&set);

    assert_eq!(report.sprints.len(), 2);
    assert_eq!(report.stats.sprints_processed, 2);
    assert_eq!(report.stats.documents_failed, 1);
    assert_eq!(report.stats.epics_created, 3);
    assert_eq!(report.stats.tasks_created, 4);
    assert_eq!(report.stats.anomalies, 1);
    assert_eq!(report.status(), RunStatus::Success);

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains(" | sprint 1 | epic Setup created as SCRUM-1"));
    assert!(log.contains(" | T1.1 | created as SCRUM-2 under SCRUM-1"));
    assert!(log.contains(" | document | skipped: "));
    assert!(log.contains(" | run | finished: 3 epics, 4 tasks created"));
}

#[test]
fn test_run_with_nothing_is_failed() {
    let mut orch = Orchestrator::new(StubPublisher::new("SCRUM"), quiet());
    let report = orch.run(&DocumentSet::default());
    assert!(report.sprints.is_empty());
    assert_eq!(report.status(), RunStatus::Failed);
}
