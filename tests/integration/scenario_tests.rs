//! End-to-end poll scenarios: MonitorService against mock ports.
//!
//! The first sample of every sequence is taken by `start`, the rest by
//! `tick`, exactly as the production loop does it.

use freezer_monitor::adapters::csv_directory::CsvDirectory;
use freezer_monitor::app::events::{AppEvent, Route};
use freezer_monitor::app::ports::{DirectoryPort, SignalPort};
use freezer_monitor::app::service::{Dispatch, MonitorService, TickOutcome};
use freezer_monitor::config::MonitorConfig;
use freezer_monitor::fsm::{SignalState, StateId};

use super::mocks::{
    ADDRESS, RecordingNotifier, RecordingSink, ScriptedSignal, StaticDirectory, lab_record,
};

use SignalState::{Closed, Open};

/// Start the service on the first sample and tick through the rest.
fn run_sequence(
    config: &MonitorConfig,
    states: &[SignalState],
    directory: &impl DirectoryPort,
    notifier: &mut RecordingNotifier,
    sink: &mut RecordingSink,
) -> (MonitorService, Vec<TickOutcome>) {
    let mut signal = ScriptedSignal::new(states);
    let mut svc = MonitorService::new(config, ADDRESS);
    svc.start(&mut signal, directory, notifier, sink).unwrap();
    let outcomes = (1..states.len())
        .map(|_| svc.tick(&mut signal, directory, notifier, sink))
        .collect();
    (svc, outcomes)
}

// ── Scenario 1: one edge, record resolved ─────────────────────

#[test]
fn single_edge_goes_to_primary_recipients() {
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();

    let (svc, outcomes) = run_sequence(
        &MonitorConfig::default(),
        &[Closed, Closed, Open],
        &directory,
        &mut notifier,
        &mut sink,
    );

    assert_eq!(notifier.attempts.len(), 1);
    let mail = &notifier.attempts[0];
    assert_eq!(mail.to, lab_record().primary_emails);
    assert_eq!(mail.from, "f@x.edu");
    assert_eq!(mail.reply_to, "r@x.edu");
    assert!(mail.body.contains("CLOSED \u{2192} OPEN"), "body: {}", mail.body);
    assert!(mail.body.contains("Room 101"));
    assert_eq!(outcomes[0], TickOutcome::Steady);
    assert!(matches!(outcomes[1], TickOutcome::Edge(_, Dispatch::Primary)));
    assert_eq!(svc.state(), Some(StateId::WaitingClosed));
    assert_eq!(directory.lookups.get(), 1, "directory consulted once per edge");
}

#[test]
fn all_clear_uses_reply_subject() {
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();

    run_sequence(
        &MonitorConfig::default(),
        &[Closed, Open, Closed],
        &directory,
        &mut notifier,
        &mut sink,
    );

    assert_eq!(
        notifier.subjects(),
        vec![
            "ALERT: Problem with -80 freezer in Room 101",
            "Re: ALERT: Problem with -80 freezer in Room 101",
        ]
    );
    assert!(notifier.attempts[1].body.contains("OPEN \u{2192} CLOSED"));
}

// ── Scenario 2: directory missing ─────────────────────────────

#[test]
fn missing_directory_reports_to_fallback_only() {
    let dir = tempfile::tempdir().unwrap();
    let directory = CsvDirectory::new(dir.path().join("absent.csv"));
    let config = MonitorConfig::default();
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();

    let (_, outcomes) = run_sequence(&config, &[Closed, Open], &directory, &mut notifier, &mut sink);

    assert_eq!(notifier.attempts.len(), 1);
    let mail = &notifier.attempts[0];
    assert_eq!(mail.to, config.fallback.recipients);
    assert_eq!(mail.from, config.fallback.from);
    assert_eq!(mail.subject, format!("Freezer directory error for monitor at {ADDRESS}"));
    assert!(mail.body.contains("directory unreadable"), "body: {}", mail.body);
    assert!(mail.body.contains("potential problem"));
    assert!(matches!(outcomes[0], TickOutcome::Edge(_, Dispatch::Fallback)));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::LookupFailed(_))), 1);
}

#[test]
fn unknown_address_reports_to_fallback() {
    let mut record = lab_record();
    record.address = "10.9.9.9".into();
    let directory = StaticDirectory::with(record);
    let config = MonitorConfig::default();
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();

    run_sequence(&config, &[Open, Closed], &directory, &mut notifier, &mut sink);

    assert_eq!(notifier.attempts.len(), 1);
    assert_eq!(notifier.attempts[0].to, config.fallback.recipients);
    assert!(notifier.attempts[0].body.contains("no directory record"));
    assert!(notifier.attempts[0].body.contains("resolution"));
}

#[test]
fn failed_fallback_drops_event() {
    let directory = StaticDirectory::empty();
    let mut notifier = RecordingNotifier::always_failing();
    let mut sink = RecordingSink::new();

    let (_, outcomes) = run_sequence(
        &MonitorConfig::default(),
        &[Closed, Open, Open, Open],
        &directory,
        &mut notifier,
        &mut sink,
    );

    assert_eq!(notifier.attempts.len(), 1);
    assert!(matches!(outcomes[0], TickOutcome::Edge(_, Dispatch::Undelivered)));
    assert_eq!(outcomes[1], TickOutcome::Steady);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Undelivered(_))), 1);
}

// ── Scenario 3: primary fails, backup tried once ──────────────

#[test]
fn primary_failure_falls_back_to_backup_recipients() {
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::failing_first(1);
    let mut sink = RecordingSink::new();

    let (_, outcomes) = run_sequence(
        &MonitorConfig::default(),
        &[Closed, Open],
        &directory,
        &mut notifier,
        &mut sink,
    );

    assert_eq!(notifier.attempts.len(), 2);
    assert_eq!(notifier.attempts[0].to, lab_record().primary_emails);
    assert_eq!(notifier.attempts[1].to, lab_record().backup_emails);
    assert_eq!(notifier.attempts[0].body, notifier.attempts[1].body);
    assert!(matches!(outcomes[0], TickOutcome::Edge(_, Dispatch::Backup)));
    assert!(sink.events.contains(&AppEvent::Delivered {
        route: Route::Backup,
        recipients: lab_record().backup_emails,
    }));
}

#[test]
fn backup_failure_stops_and_edge_is_not_refired() {
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::always_failing();
    let mut sink = RecordingSink::new();

    let (svc, outcomes) = run_sequence(
        &MonitorConfig::default(),
        &[Closed, Open, Open, Open],
        &directory,
        &mut notifier,
        &mut sink,
    );

    assert_eq!(notifier.attempts.len(), 2, "primary + one backup, nothing more");
    assert!(matches!(outcomes[0], TickOutcome::Edge(_, Dispatch::Undelivered)));
    assert_eq!(&outcomes[1..], &[TickOutcome::Steady, TickOutcome::Steady]);
    assert_eq!(svc.last_state(), Some(Open));
}

// ── Scenario 4: steady contact ────────────────────────────────

#[test]
fn steady_open_contact_sends_nothing() {
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();

    let (svc, outcomes) = run_sequence(
        &MonitorConfig::default(),
        &[Open, Open, Open, Open],
        &directory,
        &mut notifier,
        &mut sink,
    );

    assert!(notifier.attempts.is_empty());
    assert!(outcomes.iter().all(|o| *o == TickOutcome::Steady));
    assert_eq!(directory.lookups.get(), 0);
    assert_eq!(svc.tick_count(), 3);
}

// ── Read failures ─────────────────────────────────────────────

#[test]
fn read_failure_keeps_previous_state() {
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();
    let mut signal = ScriptedSignal::new(&[Closed]);
    signal.push_error();
    signal.push(Closed);
    signal.push(Open);

    let mut svc = MonitorService::new(&MonitorConfig::default(), ADDRESS);
    svc.start(&mut signal, &directory, &mut notifier, &mut sink).unwrap();

    assert_eq!(
        svc.tick(&mut signal, &directory, &mut notifier, &mut sink),
        TickOutcome::ReadFailed
    );
    assert_eq!(svc.last_state(), Some(Closed));
    assert_eq!(
        svc.tick(&mut signal, &directory, &mut notifier, &mut sink),
        TickOutcome::Steady
    );
    assert!(matches!(
        svc.tick(&mut signal, &directory, &mut notifier, &mut sink),
        TickOutcome::Edge(_, Dispatch::Primary)
    ));
    assert_eq!(notifier.attempts.len(), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ReadFailed(_))), 1);
}

#[test]
fn panicking_iteration_is_contained() {
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();
    let mut signal = ScriptedSignal::new(&[Closed]);
    signal.push_panic();
    signal.push(Open);

    let mut svc = MonitorService::new(&MonitorConfig::default(), ADDRESS);
    svc.start(&mut signal, &directory, &mut notifier, &mut sink).unwrap();

    let aborted = svc.poll_once(&mut signal, &directory, &mut notifier, &mut sink);
    assert_eq!(aborted, None);
    assert!(sink
        .events
        .contains(&AppEvent::IterationAborted("gpio driver fault".into())));
    assert_eq!(svc.last_state(), Some(Closed));

    let next = svc.poll_once(&mut signal, &directory, &mut notifier, &mut sink);
    assert!(matches!(next, Some(TickOutcome::Edge(_, Dispatch::Primary))));
    assert_eq!(notifier.subjects(), vec!["ALERT: Problem with -80 freezer in Room 101"]);
}

#[test]
fn start_fails_when_contact_unreadable() {
    let mut signal = ScriptedSignal::new(&[]);
    signal.push_error();
    let mut svc = MonitorService::new(&MonitorConfig::default(), ADDRESS);
    let result = svc.start(
        &mut signal,
        &StaticDirectory::empty(),
        &mut RecordingNotifier::new(),
        &mut RecordingSink::new(),
    );
    assert!(result.is_err());
    assert_eq!(svc.last_state(), None);
}

// ── Startup alarm (opt-in) ────────────────────────────────────

#[test]
fn startup_open_alerts_record_owners_when_enabled() {
    let config = MonitorConfig {
        alert_on_startup_open: true,
        ..MonitorConfig::default()
    };
    let directory = StaticDirectory::with(lab_record());
    let mut notifier = RecordingNotifier::new();
    let mut sink = RecordingSink::new();

    run_sequence(&config, &[Open, Open], &directory, &mut notifier, &mut sink);

    assert_eq!(notifier.attempts.len(), 1);
    assert_eq!(notifier.attempts[0].to, lab_record().primary_emails);
    assert!(notifier.attempts[0].body.contains("already open"));
}

#[test]
fn startup_closed_never_alerts() {
    let config = MonitorConfig {
        alert_on_startup_open: true,
        ..MonitorConfig::default()
    };
    let mut signal = ScriptedSignal::new(&[Closed]);
    let mut notifier = RecordingNotifier::new();
    let mut svc = MonitorService::new(&config, ADDRESS);
    let initial = svc
        .start(
            &mut signal,
            &StaticDirectory::with(lab_record()),
            &mut notifier,
            &mut RecordingSink::new(),
        )
        .unwrap();
    assert_eq!(initial, Closed);
    assert!(notifier.attempts.is_empty());
    // Sanity: the scripted signal keeps reporting its last state.
    assert_eq!(signal.read().unwrap(), Closed);
}
