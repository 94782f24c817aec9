//! Core sync engine
//!
//! The SyncEngine sequences one run:
//!
//! ```text
//! ┌──────────────┐   HostMap   ┌────────────┐
//! │ ClientSource │ ──────────▶ │ SyncEngine │
//! └──────────────┘             └────────────┘
//!                                    │
//!                      empty? ── yes ─▶ NoClients (file untouched)
//!                                    │ no
//!                                    ▼
//!                              ┌──────────┐
//!                              │ DnsSink  │ write_records, then reload
//!                              └──────────┘
//! ```
//!
//! Every step failure is fatal to the run; nothing is retried. The reload
//! step is only reached after a successful write, and the write step is
//! only reached after a fully successful fetch.

use tracing::{info, warn};

use crate::error::Result;
use crate::traits::{ClientSource, DnsSink};

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Override file rewritten and resolver reloaded
    Updated {
        /// Number of records written
        records: usize,
    },

    /// The controller returned no usable clients; the override file and
    /// resolver were left untouched. Non-fatal by design.
    NoClients,
}

/// One-shot sync engine
///
/// Owns a [`ClientSource`] and a [`DnsSink`] and runs the fetch → write →
/// reload sequence exactly once per call. Single-threaded and sequential:
/// no concurrent requests, no background tasks.
pub struct SyncEngine {
    source: Box<dyn ClientSource>,
    sink: Box<dyn DnsSink>,
}

impl SyncEngine {
    /// Create a new engine from a source and a sink
    pub fn new(source: Box<dyn ClientSource>, sink: Box<dyn DnsSink>) -> Self {
        Self { source, sink }
    }

    /// Run one synchronization pass.
    ///
    /// # Returns
    ///
    /// - `Ok(SyncOutcome::Updated)`: file written and resolver reloaded
    /// - `Ok(SyncOutcome::NoClients)`: empty mapping, nothing touched
    /// - `Err(Error)`: the failing step's error, propagated unchanged
    pub async fn run_once(&self) -> Result<SyncOutcome> {
        info!(source = self.source.source_name(), "fetching clients");
        let hosts = self.source.fetch_all().await?;

        if hosts.is_empty() {
            warn!("controller returned no usable clients, leaving override file untouched");
            return Ok(SyncOutcome::NoClients);
        }

        info!(clients = hosts.len(), "fetch complete");

        let records = self.sink.write_records(&hosts).await?;
        info!(
            records,
            sink = self.sink.sink_name(),
            "override file written"
        );

        self.sink.reload().await?;
        info!("resolver reloaded");

        Ok(SyncOutcome::Updated { records })
    }
}
