mod common;

use std::sync::Arc;

use common::{RecordingObserver, Seen, ewas_csv, source};
use ewas_explorer::ingestion::{
    CompositeObserver, Coordinator, CoordinatorOptions, FileObserver, FileRef, IngestionObserver,
    IngestionSeverity, Manifest,
};

fn coordinator_for(dir: &std::path::Path, files: &[&str], opts: CoordinatorOptions) -> Coordinator {
    let src = source(dir);
    let manifest = Manifest {
        files: files.iter().map(|f| f.to_string()).collect(),
    };
    let refs: Vec<FileRef> = manifest.file_refs(src.as_ref());
    Coordinator::new(src, refs, opts)
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let obs = Arc::new(RecordingObserver::default());
    let mut coord =
        coordinator_for(dir.path(), &["does_not_exist.csv"], CoordinatorOptions::default())
            .with_observer(obs.clone());

    coord.run(|_| {});

    assert_eq!(
        obs.seen(),
        vec![
            Seen::Started("does_not_exist.csv".to_string()),
            Seen::Failure("does_not_exist.csv".to_string(), IngestionSeverity::Critical),
            Seen::Alert("does_not_exist.csv".to_string(), IngestionSeverity::Critical),
        ]
    );
    assert_eq!(coord.status().errors.len(), 1);
}

#[test]
fn observer_receives_failure_without_alert_for_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.csv"), "id,name\n1,Ada\n").unwrap();
    let obs = Arc::new(RecordingObserver::default());
    let mut coord = coordinator_for(dir.path(), &["bad.csv"], CoordinatorOptions::default())
        .with_observer(obs.clone());

    coord.run(|_| {});

    let seen = obs.seen();
    assert_eq!(seen.last(), Some(&Seen::Failure("bad.csv".to_string(), IngestionSeverity::Error)));
    assert!(!seen.iter().any(|s| matches!(s, Seen::Alert(..))));
}

#[test]
fn lower_alert_threshold_alerts_on_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.csv"), "id\n1\n").unwrap();
    let obs = Arc::new(RecordingObserver::default());
    let opts = CoordinatorOptions {
        alert_at_or_above: IngestionSeverity::Error,
        ..Default::default()
    };
    let mut coord = coordinator_for(dir.path(), &["bad.csv"], opts).with_observer(obs.clone());

    coord.run(|_| {});

    assert!(obs.seen().contains(&Seen::Alert("bad.csv".to_string(), IngestionSeverity::Error)));
}

#[test]
fn composite_observer_fans_out_and_file_observer_logs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("A.csv"), ewas_csv("AD", "Blood", 3)).unwrap();
    let log_path = dir.path().join("ingest.log");

    let recorder = Arc::new(RecordingObserver::default());
    let recorder_obs: Arc<dyn IngestionObserver> = recorder.clone();
    let file_obs: Arc<dyn IngestionObserver> = Arc::new(FileObserver::new(&log_path));
    let composite = Arc::new(CompositeObserver::new(vec![recorder_obs, file_obs]));
    let mut coord =
        coordinator_for(dir.path(), &["A.csv", "missing.csv"], CoordinatorOptions::default())
            .with_observer(composite);

    coord.run(|_| {});

    assert!(recorder.seen().contains(&Seen::Success("A.csv".to_string(), 3)));
    assert_eq!(*recorder.batches.lock().unwrap(), 1);

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(" ok file=A.csv "));
    assert!(lines[0].ends_with("rows=3"));
    assert!(lines[1].contains(" fail severity=Critical file=missing.csv "));
    assert!(lines[2].contains(" ALERT severity=Critical file=missing.csv "));
}
