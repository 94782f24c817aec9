//! Engine flow tests
//!
//! Verify the run_once sequence against scripted doubles: write happens
//! before reload, the empty-mapping short-circuit touches nothing, and each
//! failing step stops the run exactly where the design says it must.

mod common;

use std::sync::atomic::Ordering;

use common::{RecordingSink, ScriptedSource, SourceScript, step_log};
use hostsync_core::{Error, HostMap, SyncEngine, SyncOutcome};

fn sample_hosts() -> HostMap {
    let mut hosts = HostMap::new();
    hosts.upsert("router", "192.168.0.1");
    hosts.upsert("nas-01", "192.168.0.50");
    hosts
}

#[tokio::test]
async fn full_run_writes_then_reloads() {
    let steps = step_log();
    let source = ScriptedSource::new(SourceScript::Hosts(sample_hosts()), steps.clone());
    let fetch_calls = source.fetch_calls();
    let sink = RecordingSink::new(steps.clone());
    let written = sink.written();

    let engine = SyncEngine::new(Box::new(source), Box::new(sink));
    let outcome = engine.run_once().await.unwrap();

    assert_eq!(outcome, SyncOutcome::Updated { records: 2 });
    assert_eq!(fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*steps.lock().unwrap(), vec!["fetch", "write", "reload"]);

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0],
        vec![
            ("router".to_string(), "192.168.0.1".to_string()),
            ("nas-01".to_string(), "192.168.0.50".to_string()),
        ]
    );
}

#[tokio::test]
async fn empty_mapping_short_circuits_without_touching_sink() {
    let steps = step_log();
    let source = ScriptedSource::new(SourceScript::Hosts(HostMap::new()), steps.clone());
    let sink = RecordingSink::new(steps.clone());
    let write_calls = sink.write_calls();
    let reload_calls = sink.reload_calls();

    let engine = SyncEngine::new(Box::new(source), Box::new(sink));
    let outcome = engine.run_once().await.unwrap();

    assert_eq!(outcome, SyncOutcome::NoClients);
    assert_eq!(write_calls.load(Ordering::SeqCst), 0);
    assert_eq!(reload_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetch_failure_propagates_and_touches_nothing() {
    let steps = step_log();
    let source = ScriptedSource::new(SourceScript::Fail("errorCode 1004 on page 2"), steps.clone());
    let sink = RecordingSink::new(steps.clone());
    let write_calls = sink.write_calls();
    let reload_calls = sink.reload_calls();

    let engine = SyncEngine::new(Box::new(source), Box::new(sink));
    let result = engine.run_once().await;

    assert!(
        matches!(result, Err(Error::FetchFailure(_))),
        "expected FetchFailure, got: {result:?}"
    );
    assert_eq!(write_calls.load(Ordering::SeqCst), 0);
    assert_eq!(reload_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn write_failure_skips_reload() {
    let steps = step_log();
    let source = ScriptedSource::new(SourceScript::Hosts(sample_hosts()), steps.clone());
    let sink = RecordingSink::failing_write(steps.clone());
    let reload_calls = sink.reload_calls();

    let engine = SyncEngine::new(Box::new(source), Box::new(sink));
    let result = engine.run_once().await;

    assert!(matches!(result, Err(Error::WriteFailure(_))));
    assert_eq!(reload_calls.load(Ordering::SeqCst), 0);
    assert_eq!(*steps.lock().unwrap(), vec!["fetch", "write"]);
}

#[tokio::test]
async fn reload_failure_surfaces_after_successful_write() {
    let steps = step_log();
    let source = ScriptedSource::new(SourceScript::Hosts(sample_hosts()), steps.clone());
    let sink = RecordingSink::failing_reload(steps.clone());
    let write_calls = sink.write_calls();

    let engine = SyncEngine::new(Box::new(source), Box::new(sink));
    let result = engine.run_once().await;

    assert!(matches!(result, Err(Error::ReloadFailure(_))));
    assert_eq!(write_calls.load(Ordering::SeqCst), 1, "file already written");
}
