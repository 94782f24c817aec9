//! Test doubles for engine flow tests
//!
//! Minimal scripted implementations of the core traits that record every
//! call, so tests can assert step ordering and short-circuit behavior.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use hostsync_core::error::Result;
use hostsync_core::traits::{ClientSource, DnsSink};
use hostsync_core::{Error, HostMap};

/// Shared log of engine steps, pushed by the doubles in call order
pub type StepLog = Arc<Mutex<Vec<&'static str>>>;

pub fn step_log() -> StepLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// What a [`ScriptedSource`] should do when fetched
pub enum SourceScript {
    /// Return this mapping
    Hosts(HostMap),
    /// Fail with `Error::fetch(msg)`
    Fail(&'static str),
}

/// A ClientSource that follows a fixed script and counts calls
pub struct ScriptedSource {
    script: SourceScript,
    fetch_calls: Arc<AtomicUsize>,
    steps: StepLog,
}

impl ScriptedSource {
    pub fn new(script: SourceScript, steps: StepLog) -> Self {
        Self {
            script,
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            steps,
        }
    }

    pub fn fetch_calls(&self) -> Arc<AtomicUsize> {
        self.fetch_calls.clone()
    }
}

#[async_trait::async_trait]
impl ClientSource for ScriptedSource {
    async fn fetch_all(&self) -> Result<HostMap> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.steps.lock().unwrap().push("fetch");
        match &self.script {
            SourceScript::Hosts(hosts) => Ok(hosts.clone()),
            SourceScript::Fail(msg) => Err(Error::fetch(*msg)),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A DnsSink that records writes and reloads, optionally failing either step
pub struct RecordingSink {
    write_calls: Arc<AtomicUsize>,
    reload_calls: Arc<AtomicUsize>,
    written: Arc<Mutex<Vec<Vec<(String, String)>>>>,
    fail_write: bool,
    fail_reload: bool,
    steps: StepLog,
}

impl RecordingSink {
    pub fn new(steps: StepLog) -> Self {
        Self {
            write_calls: Arc::new(AtomicUsize::new(0)),
            reload_calls: Arc::new(AtomicUsize::new(0)),
            written: Arc::new(Mutex::new(Vec::new())),
            fail_write: false,
            fail_reload: false,
            steps,
        }
    }

    pub fn failing_write(steps: StepLog) -> Self {
        Self {
            fail_write: true,
            ..Self::new(steps)
        }
    }

    pub fn failing_reload(steps: StepLog) -> Self {
        Self {
            fail_reload: true,
            ..Self::new(steps)
        }
    }

    pub fn write_calls(&self) -> Arc<AtomicUsize> {
        self.write_calls.clone()
    }

    pub fn reload_calls(&self) -> Arc<AtomicUsize> {
        self.reload_calls.clone()
    }

    /// Snapshots of every mapping handed to `write_records`
    pub fn written(&self) -> Arc<Mutex<Vec<Vec<(String, String)>>>> {
        self.written.clone()
    }
}

#[async_trait::async_trait]
impl DnsSink for RecordingSink {
    async fn write_records(&self, hosts: &HostMap) -> Result<usize> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.steps.lock().unwrap().push("write");
        if self.fail_write {
            return Err(Error::write("simulated write failure"));
        }
        let snapshot: Vec<(String, String)> = hosts
            .iter()
            .map(|(name, ip)| (name.to_string(), ip.to_string()))
            .collect();
        let len = snapshot.len();
        self.written.lock().unwrap().push(snapshot);
        Ok(len)
    }

    async fn reload(&self) -> Result<()> {
        self.reload_calls.fetch_add(1, Ordering::SeqCst);
        self.steps.lock().unwrap().push("reload");
        if self.fail_reload {
            return Err(Error::reload("simulated reload failure"));
        }
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "recording"
    }
}
