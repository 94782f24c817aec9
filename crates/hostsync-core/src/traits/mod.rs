//! Trait seams between the core flow and its collaborators
//!
//! - [`ClientSource`]: fetches the hostname→IP mapping from a controller
//! - [`DnsSink`]: writes the override file and reloads the resolver

pub mod client_source;
pub mod dns_sink;

pub use client_source::ClientSource;
pub use dns_sink::DnsSink;
