// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PrintdropError, Result};

/// Which facility the dispatcher drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrintBackend {
    /// Pick by host OS: the Windows shell on Windows, CUPS elsewhere.
    #[default]
    Auto,
    /// CUPS command-line tools (`lpstat`, `lpadmin`, `lp`).
    Cups,
    /// PowerShell and the `PrintTo` shell verb.
    WindowsShell,
    /// In-memory printers from `simulated_printers`; nothing reaches paper.
    Simulated,
}

/// Service settings, read from a JSON file. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the upload page listens on (default all interfaces).
    pub listen_addr: IpAddr,
    /// Port for the upload page (default 7001).
    pub port: u16,
    /// Flat directory that receives every accepted upload.
    pub storage_dir: PathBuf,
    /// Case-insensitive substring that selects the target printer.
    pub printer_match: String,
    /// Accepted extensions, lowercase without the dot.
    pub allowed_extensions: Vec<String>,
    /// How long to wait for the OS to acknowledge a print action.
    pub print_ack_timeout_secs: u64,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
    /// Print facility to use.
    pub print_backend: PrintBackend,
    /// Printer names reported by the `simulated` backend, in order.
    pub simulated_printers: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 7001,
            storage_dir: PathBuf::from("temple"),
            printer_match: "HP LaserJet P1007".into(),
            allowed_extensions: vec!["doc".into(), "docx".into(), "pdf".into()],
            print_ack_timeout_secs: 15,
            max_upload_bytes: 64 * 1024 * 1024,
            print_backend: PrintBackend::Auto,
            simulated_printers: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read and validate the config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&data)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Check the settings that would make the service useless or unsafe.
    pub fn validate(&self) -> Result<()> {
        if self.printer_match.trim().is_empty() {
            // An empty needle matches every printer.
            return Err(PrintdropError::Config("printer_match must not be empty".into()));
        }
        if self.allowed_extensions.is_empty() {
            return Err(PrintdropError::Config(
                "allowed_extensions must list at least one extension".into(),
            ));
        }
        if let Some(bad) = self
            .allowed_extensions
            .iter()
            .find(|ext| ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(PrintdropError::Config(format!(
                "allowed extension {bad:?} must be ASCII letters and digits"
            )));
        }
        if self.port == 0 {
            return Err(PrintdropError::Config("port must not be 0".into()));
        }
        if self.print_ack_timeout_secs == 0 {
            return Err(PrintdropError::Config(
                "print_ack_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Lowercase the extensions and strip any leading dot.
    pub fn normalize(&mut self) {
        for ext in &mut self.allowed_extensions {
            *ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.port)
    }

    pub fn print_ack_timeout(&self) -> Duration {
        Duration::from_secs(self.print_ack_timeout_secs)
    }
}
