mod common;

use common::FlakyReader;
use rsdroid_testkit::{write_to_file_with, FixtureError, RetryPolicy};
use std::error::Error as _;
use std::io::Cursor;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn quick_policy() -> RetryPolicy {
    RetryPolicy::new(5, Duration::from_millis(10))
}

#[test]
fn default_policy_is_five_attempts_200ms_apart() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.attempts, 5);
    assert_eq!(policy.delay, Duration::from_millis(200));
}

#[test]
fn succeeds_when_last_attempt_succeeds() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("fixture.bin");
    let data = b"sqlite format 3\0 and then some pages".to_vec();
    let mut source = FlakyReader::new(Cursor::new(data.clone()), 4);

    let stats = write_to_file_with(&mut source, &destination, &quick_policy()).unwrap();

    assert_eq!(source.failed_reads, 4);
    assert_eq!(stats.bytes, data.len() as u64);
    assert_eq!(std::fs::read(&destination).unwrap(), data);
}

#[test]
fn fails_only_after_all_attempts_are_exhausted() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("fixture.bin");
    let mut source = FlakyReader::new(Cursor::new(b"never copied".to_vec()), 10);
    let policy = quick_policy();

    let start = Instant::now();
    let err = write_to_file_with(&mut source, &destination, &policy).unwrap_err();
    let elapsed = start.elapsed();

    assert_eq!(source.failed_reads, 5);
    // four pauses between five attempts
    assert!(elapsed >= policy.delay * 4);
    match &err {
        FixtureError::CopyFailed { file_name, .. } => assert_eq!(file_name, "fixture.bin"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "fixture.bin: transient read failure");
    assert_eq!(
        err.source().unwrap().to_string(),
        "transient read failure"
    );
}

#[test]
fn single_attempt_policy_does_not_retry() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("fixture.bin");
    let mut source = FlakyReader::new(Cursor::new(b"data".to_vec()), 1);

    let result = write_to_file_with(
        &mut source,
        &destination,
        &RetryPolicy::new(1, Duration::from_secs(60)),
    );

    assert!(result.is_err());
    assert_eq!(source.failed_reads, 1);
}

#[test]
fn failed_attempt_leaves_destination_for_next_attempt_to_truncate() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("fixture.bin");
    std::fs::write(&destination, b"stale contents from an earlier run").unwrap();
    let mut source = FlakyReader::new(Cursor::new(b"fresh".to_vec()), 2);

    write_to_file_with(&mut source, &destination, &quick_policy()).unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), b"fresh");
}
