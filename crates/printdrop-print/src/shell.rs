// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windows shell print system.
//
// Printing goes through the `PrintTo` shell verb: Windows launches whatever
// application is associated with the file type (Word, Acrobat, Edge, ...)
// and tells it to print on the named printer.  We only learn whether the
// verb was accepted; the application may still fail later, or show a dialog
// on the host that the uploader never sees.
//
// All three operations go through PowerShell so no native bindings are
// needed:
//   list     Win32_Printer instances with Local = TRUE
//   default  WScript.Network.SetDefaultPrinter
//   print    Start-Process -Verb PrintTo (returns without waiting)

use std::path::Path;
use std::process::Command;

use tracing::info;

use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::types::PrinterRecord;

use crate::command::{self, output_lines};
use crate::system::PrintSystem;

/// Forces UTF-8 output so non-ASCII printer names survive the pipe.
const UTF8_PRELUDE: &str = "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; ";

const LIST_LOCAL_PRINTERS: &str =
    "Get-CimInstance -ClassName Win32_Printer -Filter 'Local=TRUE' | ForEach-Object { $_.Name }";

/// PowerShell-driven print system for Windows hosts.
#[derive(Debug, Clone)]
pub struct ShellPrintSystem {
    powershell: String,
}

impl Default for ShellPrintSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellPrintSystem {
    pub fn new() -> Self {
        Self {
            powershell: "powershell.exe".into(),
        }
    }

    fn script(&self, script: &str) -> Command {
        let mut cmd = Command::new(&self.powershell);
        cmd.args(["-NoProfile", "-NonInteractive", "-Command"])
            .arg(format!("{UTF8_PRELUDE}{script}"));
        cmd
    }
}

impl PrintSystem for ShellPrintSystem {
    fn platform_name(&self) -> &str {
        "Windows shell"
    }

    fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        let stdout = command::run(self.script(LIST_LOCAL_PRINTERS))
            .map_err(|e| PrintdropError::PrinterEnumeration(e.to_string()))?;
        Ok(output_lines(&stdout).map(PrinterRecord::new).collect())
    }

    fn set_default_printer(&self, printer: &str) -> Result<()> {
        command::run(self.script(&set_default_script(printer)))
            .map_err(|e| PrintdropError::InvocationFailed(e.to_string()))?;
        info!(printer, "Windows default printer set");
        Ok(())
    }

    fn print_to(&self, file: &Path, printer: &str) -> Result<()> {
        // The verb resolves relative paths against the handler's directory,
        // not ours.
        let file = std::path::absolute(file)?;
        command::run(self.script(&print_to_script(&file, printer)))
            .map_err(|e| PrintdropError::InvocationFailed(e.to_string()))?;
        info!(printer, file = %file.display(), "PrintTo verb accepted");
        Ok(())
    }
}

/// Quote `value` as a PowerShell single-quoted literal.
pub fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn set_default_script(printer: &str) -> String {
    format!(
        "(New-Object -ComObject WScript.Network).SetDefaultPrinter({})",
        ps_quote(printer)
    )
}

/// `Start-Process` call that applies the `PrintTo` verb to `file`.
///
/// The printer name travels as one double-quoted argument so names with
/// spaces reach the handler intact.
pub fn print_to_script(file: &Path, printer: &str) -> String {
    format!(
        "Start-Process -FilePath {} -Verb PrintTo -ArgumentList {} -WindowStyle Hidden",
        ps_quote(&file.to_string_lossy()),
        ps_quote(&format!("\"{printer}\""))
    )
}
