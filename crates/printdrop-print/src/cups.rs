// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CUPS print system (Linux, macOS, BSD).
//
// Drives the stock CUPS command-line tools:
//   lpstat -e            list destinations, one per line
//   lpadmin -d <name>    set the server-wide default destination
//   lp -d <name> -- f    queue a file on a named destination
//
// CUPS converts doc/docx/pdf through its own filter chain, which plays the
// role the file-type association plays on Windows.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::types::PrinterRecord;

use crate::command::{self, CommandError, output_lines};
use crate::system::PrintSystem;

/// Message `lpstat` prints when no queue exists.
const NO_DESTINATIONS: &str = "No destinations added";

/// CUPS command-line print system.
#[derive(Debug, Clone)]
pub struct CupsPrintSystem {
    lpstat: String,
    lpadmin: String,
    lp: String,
}

impl Default for CupsPrintSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CupsPrintSystem {
    pub fn new() -> Self {
        Self {
            lpstat: "lpstat".into(),
            lpadmin: "lpadmin".into(),
            lp: "lp".into(),
        }
    }
}

impl PrintSystem for CupsPrintSystem {
    fn platform_name(&self) -> &str {
        "CUPS"
    }

    fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        let mut cmd = Command::new(&self.lpstat);
        cmd.arg("-e");

        match command::run(cmd) {
            Ok(stdout) => Ok(parse_destinations(&stdout)),
            Err(e) if e.stderr().contains(NO_DESTINATIONS) => {
                debug!("CUPS has no destinations");
                Ok(Vec::new())
            }
            Err(e) => Err(PrintdropError::PrinterEnumeration(e.to_string())),
        }
    }

    fn set_default_printer(&self, printer: &str) -> Result<()> {
        let mut cmd = Command::new(&self.lpadmin);
        cmd.arg("-d").arg(printer);
        command::run(cmd).map_err(invocation_err)?;
        info!(printer, "CUPS default destination set");
        Ok(())
    }

    fn print_to(&self, file: &Path, printer: &str) -> Result<()> {
        let mut cmd = Command::new(&self.lp);
        cmd.arg("-d").arg(printer).arg("--").arg(file);
        let stdout = command::run(cmd).map_err(invocation_err)?;

        match parse_request_id(&stdout) {
            Some(request_id) => info!(printer, request_id, "CUPS accepted print request"),
            None => info!(printer, output = stdout.trim(), "CUPS accepted print request"),
        }
        Ok(())
    }
}

fn invocation_err(e: CommandError) -> PrintdropError {
    PrintdropError::InvocationFailed(e.to_string())
}

/// Parse `lpstat -e` output into printer records, keeping CUPS order.
pub fn parse_destinations(stdout: &str) -> Vec<PrinterRecord> {
    output_lines(stdout).map(PrinterRecord::new).collect()
}

/// Extract the job id from `lp` output such as
/// `request id is HP_LaserJet_P1007-42 (1 file(s))`.
pub fn parse_request_id(stdout: &str) -> Option<&str> {
    let rest = stdout.split("request id is ").nth(1)?;
    rest.split_whitespace().next()
}
