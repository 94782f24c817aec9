// # Pi-hole DNS Sink
//
// This crate provides the Pi-hole implementation of `DnsSink` for the
// hostsync system: it rewrites the local DNS override file
// (`/etc/pihole/custom.list` by default) and reloads the resolver via the
// `pihole restartdns` command.
//
// ## File format
//
// One line per record, in the mapping's iteration order:
//
// ```text
// 192.168.0.1 router.lan
// 192.168.0.50 nas-01.lan
// ```
//
// The whole file is replaced on every run; no diffing, no merging, no
// comments preserved. The replacement is atomic: content goes to a sibling
// `.tmp` file which is then renamed over the target, so the resolver never
// observes a half-written file.
//
// ## Dry-run mode
//
// With `dry_run` set, the rendered content is logged and neither the file
// nor the resolver is touched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use hostsync_core::traits::DnsSink;
use hostsync_core::{Error, HostMap, Result};

/// Pi-hole override file sink
pub struct PiholeSink {
    path: PathBuf,
    domain_suffix: String,
    reload_command: Vec<String>,
    dry_run: bool,
}

impl PiholeSink {
    /// Create a sink.
    ///
    /// # Parameters
    ///
    /// - `path`: override file to replace
    /// - `domain_suffix`: appended to every hostname (e.g. "lan")
    /// - `reload_command`: program + arguments invoked after a write
    /// - `dry_run`: log instead of writing/reloading
    pub fn new(
        path: impl Into<PathBuf>,
        domain_suffix: impl Into<String>,
        reload_command: Vec<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            path: path.into(),
            domain_suffix: domain_suffix.into(),
            reload_command,
            dry_run,
        }
    }

    /// The override file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the full file body: `<ip> <hostname>.<suffix>\n` per entry
    fn render(&self, hosts: &HostMap) -> String {
        let mut body = String::new();
        for (hostname, ip) in hosts.iter() {
            body.push_str(ip);
            body.push(' ');
            body.push_str(hostname);
            body.push('.');
            body.push_str(&self.domain_suffix);
            body.push('\n');
        }
        body
    }

    /// Sibling temp file used for the atomic replace
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl DnsSink for PiholeSink {
    async fn write_records(&self, hosts: &HostMap) -> Result<usize> {
        let body = self.render(hosts);

        if self.dry_run {
            info!(
                records = hosts.len(),
                path = %self.path.display(),
                "[dry-run] would replace override file with:\n{body}"
            );
            return Ok(hosts.len());
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::write(format!("failed to create {}: {e}", temp_path.display()))
            })?;

            file.write_all(body.as_bytes()).await.map_err(|e| {
                Error::write(format!("failed to write {}: {e}", temp_path.display()))
            })?;

            file.flush().await.map_err(|e| {
                Error::write(format!("failed to flush {}: {e}", temp_path.display()))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::write(format!(
                "failed to rename {} to {}: {e}",
                temp_path.display(),
                self.path.display()
            ))
        })?;

        debug!(records = hosts.len(), path = %self.path.display(), "override file replaced");
        Ok(hosts.len())
    }

    async fn reload(&self) -> Result<()> {
        if self.dry_run {
            info!(command = ?self.reload_command, "[dry-run] would reload resolver");
            return Ok(());
        }

        let (program, args) = self
            .reload_command
            .split_first()
            .ok_or_else(|| Error::reload("reload command is empty"))?;

        debug!(%program, ?args, "invoking resolver reload");
        let status = tokio::process::Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|e| Error::reload(format!("failed to run {program}: {e}")))?;

        if !status.success() {
            return Err(Error::reload(format!("{program} exited with {status}")));
        }
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "pihole"
    }
}
