//! The hostname→IP mapping built during a fetch and handed to the writer.
//!
//! Backed by an `IndexMap` so the override file is written in insertion
//! order. Upserting an existing hostname overwrites its IP in place
//! (last write wins) without moving the entry.

use indexmap::IndexMap;

/// Normalize a controller-reported hostname into a DNS-safe label:
/// lowercase, underscores replaced with hyphens.
///
/// Idempotent: normalizing an already-normalized name is a no-op.
pub fn normalize_hostname(raw: &str) -> String {
    raw.to_lowercase().replace('_', "-")
}

/// Insertion-ordered mapping from hostname to IP address.
///
/// Entries with an empty hostname or IP are never stored; the writer can
/// rely on every entry having both sides non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostMap {
    entries: IndexMap<String, String>,
}

impl HostMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry (last write wins).
    ///
    /// Returns `false` without storing anything if either side is empty.
    pub fn upsert(&mut self, hostname: impl Into<String>, ip: impl Into<String>) -> bool {
        let hostname = hostname.into();
        let ip = ip.into();
        if hostname.is_empty() || ip.is_empty() {
            return false;
        }
        self.entries.insert(hostname, ip);
        true
    }

    /// Look up the IP for a hostname
    pub fn get(&self, hostname: &str) -> Option<&str> {
        self.entries.get(hostname).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, ip)| (name.as_str(), ip.as_str()))
    }
}
