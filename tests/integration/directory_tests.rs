//! CSV directory adapter driven through the monitor service.
//!
//! The directory file is edited between edges; each edge must see the
//! file as it is at that moment.

use std::fs;
use std::path::Path;

use freezer_monitor::adapters::csv_directory::CsvDirectory;
use freezer_monitor::app::ports::{DirectoryPort, LookupError};
use freezer_monitor::app::service::{Dispatch, MonitorService, TickOutcome};
use freezer_monitor::config::MonitorConfig;
use freezer_monitor::directory::DirectoryLoadError;
use freezer_monitor::fsm::SignalState::{Closed, Open};

use super::mocks::{ADDRESS, RecordingNotifier, RecordingSink, ScriptedSignal};

const HEADER: &str = "Freezer,IP,Location,Email,Backup Email,Reply-To,From,Comments\n";

fn write_directory(path: &Path, rows: &str) {
    fs::write(path, format!("{HEADER}{rows}")).unwrap();
}

#[test]
fn edits_take_effect_on_next_edge() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    write_directory(
        &path,
        "1,10.0.0.5,Room 101,old@x.edu,b@x.edu,r@x.edu,f@x.edu,\n",
    );

    let directory = CsvDirectory::new(&path);
    let mut signal = ScriptedSignal::new(&[Closed, Open, Closed]);
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), ADDRESS);
    svc.start(&mut signal, &directory, &mut notifier, &mut sink).unwrap();

    svc.tick(&mut signal, &directory, &mut notifier, &mut sink);
    write_directory(
        &path,
        "1,10.0.0.5,Room 202,\"new@x.edu, pi@x.edu\",b@x.edu,r@x.edu,f@x.edu,\n",
    );
    svc.tick(&mut signal, &directory, &mut notifier, &mut sink);

    assert_eq!(notifier.attempts.len(), 2);
    assert_eq!(notifier.attempts[0].to, vec!["old@x.edu"]);
    assert!(notifier.attempts[0].subject.ends_with("Room 101"));
    assert_eq!(notifier.attempts[1].to, vec!["new@x.edu", "pi@x.edu"]);
    assert!(notifier.attempts[1].subject.ends_with("Room 202"));
}

#[test]
fn broken_file_routes_to_fallback_until_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    fs::write(&path, "IP,Location,Email\n10.0.0.5,Room 101,a@x.edu\n").unwrap();

    let config = MonitorConfig::default();
    let directory = CsvDirectory::new(&path);
    let mut signal = ScriptedSignal::new(&[Closed, Open, Closed]);
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();
    let mut svc = MonitorService::new(&config, ADDRESS);
    svc.start(&mut signal, &directory, &mut notifier, &mut sink).unwrap();

    let first = svc.tick(&mut signal, &directory, &mut notifier, &mut sink);
    assert!(matches!(first, TickOutcome::Edge(_, Dispatch::Fallback)));
    assert_eq!(notifier.attempts[0].to, config.fallback.recipients);
    assert!(notifier.attempts[0].body.contains("Backup Email"));

    write_directory(&path, "1,10.0.0.5,Room 101,a@x.edu,b@x.edu,r@x.edu,f@x.edu,\n");
    let second = svc.tick(&mut signal, &directory, &mut notifier, &mut sink);
    assert!(matches!(second, TickOutcome::Edge(_, Dispatch::Primary)));
    assert_eq!(notifier.attempts[1].to, vec!["a@x.edu"]);
}

#[test]
fn load_errors_surface_through_the_port() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    fs::write(&path, HEADER).unwrap();

    let err = CsvDirectory::new(&path).lookup(ADDRESS).unwrap_err();
    assert_eq!(err, LookupError::Load(DirectoryLoadError::Empty));

    write_directory(&path, "1,10.0.0.6,Room 6,a@x.edu,b@x.edu,r@x.edu,f@x.edu,\n");
    let err = CsvDirectory::new(&path).lookup(ADDRESS).unwrap_err();
    assert!(matches!(err, LookupError::NotFound(_)));
}
