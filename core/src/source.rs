//! The central **abstraction** for obtaining scan dumps.
//!
//! The parsing core itself never touches a file, socket or process; it
//! consumes one complete text dump at a time. This module defines the seam
//! that produces those dumps, so the survey loop can run against a live
//! wireless interface, a remote router or a saved capture without caring
//! which.

use std::path::PathBuf;
use std::process::Output;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

use wavemap_common::wifi::dialect::Dialect;

/// A producer of raw scan-dump text.
#[async_trait]
pub trait ScanSource {
    /// The dialect the produced text follows.
    fn dialect(&self) -> Dialect;

    /// Human-readable description for logs and headers.
    fn describe(&self) -> String;

    /// Produces one complete dump.
    async fn fetch(&self) -> anyhow::Result<String>;
}

/// Live scan through the local wireless stack.
///
/// Requires `iw` with the `CAP_NET_ADMIN` capability (or root).
pub struct IwSource {
    pub iface: String,
}

#[async_trait]
impl ScanSource for IwSource {
    fn dialect(&self) -> Dialect {
        Dialect::IwScan
    }

    fn describe(&self) -> String {
        format!("iw scan on {}", self.iface)
    }

    async fn fetch(&self) -> anyhow::Result<String> {
        let output = Command::new("iw")
            .args([self.iface.as_str(), "scan"])
            .output()
            .await
            .context("spawning iw")?;
        stdout_text(output, "iw scan")
    }
}

/// Scan through a router reached over ssh, running `iwlist` remotely.
///
/// Older Ubiquiti firmwares only offer rsa host keys, hence the two
/// algorithm overrides.
pub struct SshSource {
    pub user: String,
    pub host: String,
    pub iface: String,
}

#[async_trait]
impl ScanSource for SshSource {
    fn dialect(&self) -> Dialect {
        Dialect::Iwlist
    }

    fn describe(&self) -> String {
        format!("iwlist via {}@{}", self.user, self.host)
    }

    async fn fetch(&self) -> anyhow::Result<String> {
        let output = Command::new("ssh")
            .args([
                "-oHostKeyAlgorithms=+ssh-rsa",
                "-oPubkeyAcceptedKeyTypes=+ssh-rsa",
                &format!("{}@{}", self.user, self.host),
                &format!("iwlist {} scan", self.iface),
            ])
            .output()
            .await
            .context("spawning ssh")?;
        stdout_text(output, "remote iwlist scan")
    }
}

/// A dump saved to disk, for replaying captures and for tests.
pub struct FileSource {
    pub path: PathBuf,
    pub dialect: Dialect,
}

#[async_trait]
impl ScanSource for FileSource {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn describe(&self) -> String {
        format!("dump file {}", self.path.display())
    }

    async fn fetch(&self) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))
    }
}

fn stdout_text(output: Output, what: &str) -> anyhow::Result<String> {
    anyhow::ensure!(
        output.status.success(),
        "{what} failed: {}",
        String::from_utf8_lossy(&output.stderr).trim()
    );
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_source_reads_back_what_was_written() {
        let path = std::env::temp_dir().join("wavemap-source-test.dump");
        tokio::fs::write(&path, "BSS 00:11:22:33:44:55(on wlan0)\n\tfreq: 2412\n")
            .await
            .unwrap();

        let source = FileSource {
            path: path.clone(),
            dialect: Dialect::IwScan,
        };
        assert_eq!(source.dialect(), Dialect::IwScan);
        let text = source.fetch().await.unwrap();
        assert!(text.starts_with("BSS 00:11:22:33:44:55"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = FileSource {
            path: PathBuf::from("/definitely/not/here.dump"),
            dialect: Dialect::Iwlist,
        };
        assert!(source.fetch().await.is_err());
    }
}
