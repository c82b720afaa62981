//! Integration tests for the process supervisor
//!
//! These spawn real processes through `sh`, which is available on every
//! unix CI runner this crate targets.

#![cfg(unix)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use storeship_errors::{Error, ProcessError};
use storeship_process::{CommandSpec, OutputLine, ProcessRunner, StreamKind, Supervisor};

fn collecting_sink() -> (Arc<Mutex<Vec<OutputLine>>>, impl Fn(OutputLine) + Send + Sync) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = Arc::clone(&lines);
    let sink = move |line: OutputLine| {
        sink_lines.lock().unwrap().push(line);
    };
    (lines, sink)
}

#[tokio::test]
async fn streams_stdout_lines_in_order() {
    let (lines, sink) = collecting_sink();
    let spec = CommandSpec::new("sh").args(["-c", r#"printf 'one\ntwo\n'"#]);

    let outcome = Supervisor::new().run(spec, &sink).await.unwrap();

    assert!(outcome.success());
    let captured: Vec<String> = lines.lock().unwrap().iter().map(|l| l.text.clone()).collect();
    assert_eq!(captured, ["one", "two"]);
}

#[tokio::test]
async fn captures_stderr_with_stream_tag() {
    let (lines, sink) = collecting_sink();
    let spec = CommandSpec::new("sh").args(["-c", "echo oops 1>&2"]);

    let outcome = Supervisor::new().run(spec, &sink).await.unwrap();

    assert!(outcome.success());
    let captured = lines.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].stream, StreamKind::Stderr);
    assert_eq!(captured[0].text, "oops");
}

#[tokio::test]
async fn nonzero_exit_is_reported_not_raised() {
    let (_lines, sink) = collecting_sink();
    let spec = CommandSpec::new("sh").args(["-c", "exit 3"]);

    let outcome = Supervisor::new().run(spec, &sink).await.unwrap();

    assert!(!outcome.success());
    assert_eq!(outcome.code, 3);
}

#[tokio::test]
async fn missing_executable_is_a_launch_error() {
    let (_lines, sink) = collecting_sink();
    let spec = CommandSpec::new("definitely-not-a-real-binary-4a1b");

    let err = Supervisor::new().run(spec, &sink).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Process(ProcessError::LaunchFailed { .. })
    ));
}

#[tokio::test]
async fn cancellation_kills_the_child() {
    let (_lines, sink) = collecting_sink();
    let token = CancellationToken::new();
    let supervisor = Supervisor::with_cancellation(token.clone());

    let killer = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        killer.cancel();
    });

    let started = Instant::now();
    let spec = CommandSpec::new("sh").args(["-c", "sleep 30"]);
    let err = supervisor.run(spec, &sink).await.unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn lines_arrive_while_the_process_is_still_running() {
    // The first line is flushed, then the process sleeps; the sink must
    // already hold the line before exit.
    let seen_early = Arc::new(Mutex::new(false));
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen_early);
    let sink_lines = Arc::clone(&lines);
    let started = Instant::now();
    let sink = move |line: OutputLine| {
        if started.elapsed() < Duration::from_secs(2) {
            *sink_seen.lock().unwrap() = true;
        }
        sink_lines.lock().unwrap().push(line);
    };

    let spec = CommandSpec::new("sh").args(["-c", "echo first; sleep 3; echo second"]);
    let outcome = Supervisor::new().run(spec, &sink).await.unwrap();

    assert!(outcome.success());
    assert!(*seen_early.lock().unwrap(), "first line arrived only after exit");
    assert_eq!(lines.lock().unwrap().len(), 2);
}
