// # hostsync-core
//
// Core library for synchronizing local DNS records with live client
// information from a network controller.
//
// ## Architecture Overview
//
// - **ClientSource**: Trait for fetching the hostname→IP mapping from a
//   controller (token handling and pagination live behind this seam)
// - **DnsSink**: Trait for writing the resolver override file and reloading
//   the resolver
// - **SyncEngine**: Orchestrates one run: fetch → write → reload, with the
//   empty-mapping short-circuit
// - **HostMap**: Insertion-ordered hostname→IP mapping with last-write-wins
//   upsert and hostname normalization
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core flow is separate from controller and
//    resolver specifics
// 2. **One-Shot**: A run is a single sequential pass; no background tasks
// 3. **Fail-Fast**: Every step failure aborts the run; nothing is retried
// 4. **Explicit Failure**: A failed fetch is an error, never an empty mapping

pub mod config;
pub mod engine;
pub mod error;
pub mod hostmap;
pub mod traits;

// Re-export core types for convenience
pub use config::{ControllerConfig, DnsFileConfig, ReloadConfig, SyncConfig};
pub use engine::{SyncEngine, SyncOutcome};
pub use error::{Error, Result};
pub use hostmap::{HostMap, normalize_hostname};
pub use traits::{ClientSource, DnsSink};
