// # Client Source Trait
//
// Defines the interface for fetching the complete hostname→IP mapping from
// a network controller.
//
// ## Implementations
//
// - Omada controller: `hostsync-source-omada` crate
//
// ## Responsibilities
//
// A source owns everything controller-specific: credentials, token
// lifecycle, pagination, and per-record filtering/normalization. The engine
// only ever sees the finished mapping or an error.
//
// A failed fetch MUST surface as an error, never as an empty mapping; the
// engine treats an empty mapping as "the controller really has no usable
// clients" and short-circuits without touching the DNS file.

use async_trait::async_trait;

use crate::hostmap::HostMap;

/// Trait for controller client-listing implementations
#[async_trait]
pub trait ClientSource: Send + Sync {
    /// Fetch the complete, deduplicated hostname→IP mapping.
    ///
    /// Hostnames are normalized and entries missing either field are
    /// dropped before the mapping is returned.
    ///
    /// # Returns
    ///
    /// - `Ok(HostMap)`: every known client with both hostname and IP;
    ///   may be legitimately empty
    /// - `Err(Error)`: authentication, transport, or listing failure;
    ///   no partial mapping is returned
    async fn fetch_all(&self) -> Result<HostMap, crate::Error>;

    /// Short identifier for logging (e.g. "omada")
    fn source_name(&self) -> &'static str;
}
