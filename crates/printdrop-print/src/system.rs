// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic view of the host's printing facilities.
//
// The dispatcher only ever talks to a `PrintSystem`.  Every method blocks
// the calling thread, so async callers run them on `spawn_blocking`.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use printdrop_core::config::{AppConfig, PrintBackend};
use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::types::PrinterRecord;

use crate::cups::CupsPrintSystem;
use crate::memory::MemoryPrintSystem;
use crate::shell::ShellPrintSystem;

/// The host facilities the dispatcher needs.
pub trait PrintSystem: Send + Sync {
    /// Human-readable name of the facility (e.g. "CUPS", "Windows shell").
    fn platform_name(&self) -> &str;

    /// Locally registered printers, in the order the OS reports them.
    fn list_printers(&self) -> Result<Vec<PrinterRecord>>;

    /// Make `printer` the host-wide default printer.
    fn set_default_printer(&self, printer: &str) -> Result<()>;

    /// Ask the OS to print `file` on `printer`.
    ///
    /// Returns once the OS has accepted the request; the document may still
    /// fail to render or spool afterwards.
    fn print_to(&self, file: &Path, printer: &str) -> Result<()>;
}

/// Build the print system selected by `config`.
pub fn print_system_for(config: &AppConfig) -> Arc<dyn PrintSystem> {
    let system: Arc<dyn PrintSystem> = match config.print_backend {
        PrintBackend::Auto => platform_print_system(),
        PrintBackend::Cups => Arc::new(CupsPrintSystem::new()),
        PrintBackend::WindowsShell => Arc::new(ShellPrintSystem::new()),
        PrintBackend::Simulated => {
            Arc::new(MemoryPrintSystem::with_printers(config.simulated_printers.clone()))
        }
    };
    info!(backend = system.platform_name(), "print system selected");
    system
}

/// The native print system for the target operating system.
pub fn platform_print_system() -> Arc<dyn PrintSystem> {
    #[cfg(windows)]
    {
        Arc::new(ShellPrintSystem::new())
    }
    #[cfg(unix)]
    {
        Arc::new(CupsPrintSystem::new())
    }
    #[cfg(not(any(windows, unix)))]
    {
        Arc::new(UnsupportedPrintSystem)
    }
}

/// Print system for targets with neither CUPS nor the Windows shell.
pub struct UnsupportedPrintSystem;

impl PrintSystem for UnsupportedPrintSystem {
    fn platform_name(&self) -> &str {
        "unsupported"
    }

    fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        tracing::warn!("PrintSystem::list_printers called on unsupported platform");
        Err(PrintdropError::PlatformUnavailable)
    }

    fn set_default_printer(&self, _printer: &str) -> Result<()> {
        Err(PrintdropError::PlatformUnavailable)
    }

    fn print_to(&self, _file: &Path, _printer: &str) -> Result<()> {
        Err(PrintdropError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_backend_reports_configured_printers() {
        let config = AppConfig {
            print_backend: PrintBackend::Simulated,
            simulated_printers: vec!["Microsoft XPS".into(), "HP LaserJet P1007".into()],
            ..Default::default()
        };
        let system = print_system_for(&config);
        let names: Vec<String> = system
            .list_printers()
            .unwrap()
            .into_iter()
            .map(|p| p.display_name)
            .collect();
        assert_eq!(names, ["Microsoft XPS", "HP LaserJet P1007"]);
    }

    #[test]
    fn explicit_backends_are_honoured() {
        let cups = AppConfig {
            print_backend: PrintBackend::Cups,
            ..Default::default()
        };
        assert_eq!(print_system_for(&cups).platform_name(), "CUPS");

        let shell = AppConfig {
            print_backend: PrintBackend::WindowsShell,
            ..Default::default()
        };
        assert_eq!(print_system_for(&shell).platform_name(), "Windows shell");
    }

    #[test]
    fn unsupported_platform_fails_every_call() {
        let system = UnsupportedPrintSystem;
        assert!(matches!(
            system.list_printers(),
            Err(PrintdropError::PlatformUnavailable)
        ));
        assert!(system.set_default_printer("x").is_err());
        assert!(system.print_to(Path::new("a.pdf"), "x").is_err());
    }
}
