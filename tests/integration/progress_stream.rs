//! The progress event stream and its line rendering.

use super::test_utils::TreeFixture;
use md5tree::pipeline::{Pipeline, RunOptions};
use md5tree::progress::{DigestEvent, Phase, ProgressBus, ReportStyle, Reporter};
use md5tree::tree::hasher::DigestOptions;

#[test]
fn test_events_follow_phase_order() {
    let fixture = TreeFixture::new(&[("d/a.txt", "aaaa"), ("d/b.txt", "bbbb")]);
    let pipeline =
        Pipeline::new(&fixture.source, &fixture.destination, RunOptions::default()).unwrap();

    let (bus, rx) = ProgressBus::new_pair();
    pipeline.run(&bus).unwrap();
    drop(bus);
    let events: Vec<DigestEvent> = rx.iter().map(|envelope| envelope.event).collect();

    let aggregate_at = events
        .iter()
        .position(|e| matches!(e, DigestEvent::PhaseStarted { phase: Phase::Aggregate }))
        .unwrap();
    assert!(matches!(
        events[0],
        DigestEvent::PhaseStarted {
            phase: Phase::Mirror
        }
    ));
    let files_done = events[..aggregate_at]
        .iter()
        .filter(|e| matches!(e, DigestEvent::FileDone { .. }))
        .count();
    assert_eq!(files_done, 2);
    assert!(events[aggregate_at..]
        .iter()
        .any(|e| matches!(e, DigestEvent::DirectoryDone { .. })));
}

#[test]
fn test_progress_events_every_interval() {
    let fixture = TreeFixture::new(&[("ten.bin", "0123456789")]);
    let options = RunOptions {
        digest: DigestOptions {
            block_size: 1,
            progress_interval: 2,
        },
        ..RunOptions::default()
    };
    let pipeline = Pipeline::new(&fixture.source, &fixture.destination, options).unwrap();

    let (bus, rx) = ProgressBus::new_pair();
    pipeline.run(&bus).unwrap();
    drop(bus);
    let percents: Vec<f64> = rx
        .iter()
        .filter_map(|envelope| match envelope.event {
            DigestEvent::FileProgress { percent, .. } => Some(percent),
            _ => None,
        })
        .collect();

    assert_eq!(percents, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
}

#[test]
fn test_reporter_renders_done_lines() {
    let fixture = TreeFixture::new(&[("x.txt", "x")]);
    let pipeline =
        Pipeline::new(&fixture.source, &fixture.destination, RunOptions::default()).unwrap();

    let (bus, rx) = ProgressBus::new_pair();
    let reporter = Reporter::new(ReportStyle::Line, false, Vec::new()).spawn(rx);
    pipeline.run(&bus).unwrap();
    drop(bus);
    let out = String::from_utf8(reporter.join().unwrap().unwrap()).unwrap();

    let source_file = pipeline.source_root().join("x.txt");
    assert!(out.contains(&format!("\r0%        {}", source_file.display())));
    assert!(out.contains(&format!("\rDONE        {}\n", source_file.display())));
    assert!(out.contains(" aggregating directory checksums "));
}
