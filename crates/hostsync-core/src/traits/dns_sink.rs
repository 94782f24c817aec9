// # DNS Sink Trait
//
// Defines the interface for applying a finished mapping to the local
// resolver: write the override file, then reload the resolver so it takes
// effect.
//
// ## Implementations
//
// - Pi-hole custom.list + `pihole restartdns`: `hostsync-dns-pihole` crate
//
// ## Contract
//
// `write_records` replaces the whole file (no diffing, no merging) and must
// close its file handle on every exit path. `reload` is only invoked by the
// engine after a successful write; a reload failure does not roll back the
// already-written file.

use async_trait::async_trait;

use crate::hostmap::HostMap;

/// Trait for resolver override-file implementations
#[async_trait]
pub trait DnsSink: Send + Sync {
    /// Replace the override file with one line per mapping entry, in the
    /// mapping's iteration order.
    ///
    /// # Returns
    ///
    /// - `Ok(usize)`: number of records written
    /// - `Err(Error)`: I/O failure; the reload step must not run
    async fn write_records(&self, hosts: &HostMap) -> Result<usize, crate::Error>;

    /// Reload the resolver so the new file takes effect.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: reload command exited zero
    /// - `Err(Error)`: spawn failure or non-zero exit; the written file
    ///   stays in place
    async fn reload(&self) -> Result<(), crate::Error>;

    /// Short identifier for logging (e.g. "pihole")
    fn sink_name(&self) -> &'static str;
}
