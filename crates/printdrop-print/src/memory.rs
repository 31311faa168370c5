// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory print system.
//
// Reports a fixed printer list and records every call instead of touching
// the host.  Backs the `simulated` backend (try the upload page on a machine
// without the real printer) and the dispatcher and HTTP tests.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::info;

use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::types::PrinterRecord;

use crate::system::PrintSystem;

/// One call made against a [`MemoryPrintSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintCall {
    ListPrinters,
    SetDefault(String),
    PrintTo { file: PathBuf, printer: String },
}

/// Print system that lives entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryPrintSystem {
    printers: Vec<PrinterRecord>,
    default_printer: Mutex<Option<String>>,
    calls: Mutex<Vec<PrintCall>>,
    fail_enumeration: Option<String>,
    fail_default: Option<String>,
    fail_print: Option<String>,
    print_delay: Option<Duration>,
}

impl MemoryPrintSystem {
    /// A system reporting `names` in the given order.
    pub fn with_printers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            printers: names.into_iter().map(PrinterRecord::new).collect(),
            ..Default::default()
        }
    }

    /// Make `list_printers` fail with `reason`.
    pub fn failing_enumeration(mut self, reason: impl Into<String>) -> Self {
        self.fail_enumeration = Some(reason.into());
        self
    }

    /// Make `set_default_printer` fail with `reason`.
    pub fn failing_default(mut self, reason: impl Into<String>) -> Self {
        self.fail_default = Some(reason.into());
        self
    }

    /// Make `print_to` fail with `reason`.
    pub fn failing_print(mut self, reason: impl Into<String>) -> Self {
        self.fail_print = Some(reason.into());
        self
    }

    /// Make `print_to` block for `delay` before returning.
    pub fn slow_print(mut self, delay: Duration) -> Self {
        self.print_delay = Some(delay);
        self
    }

    /// The printer most recently made default, if any.
    pub fn default_printer(&self) -> Option<String> {
        lock(&self.default_printer).clone()
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<PrintCall> {
        lock(&self.calls).clone()
    }

    /// Files handed to `print_to`, with their printer.
    pub fn printed(&self) -> Vec<(PathBuf, String)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                PrintCall::PrintTo { file, printer } => Some((file.clone(), printer.clone())),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PrintCall) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PrintSystem for MemoryPrintSystem {
    fn platform_name(&self) -> &str {
        "simulated"
    }

    fn list_printers(&self) -> Result<Vec<PrinterRecord>> {
        self.record(PrintCall::ListPrinters);
        if let Some(reason) = &self.fail_enumeration {
            return Err(PrintdropError::PrinterEnumeration(reason.clone()));
        }
        Ok(self.printers.clone())
    }

    fn set_default_printer(&self, printer: &str) -> Result<()> {
        self.record(PrintCall::SetDefault(printer.to_owned()));
        if let Some(reason) = &self.fail_default {
            return Err(PrintdropError::InvocationFailed(reason.clone()));
        }
        *lock(&self.default_printer) = Some(printer.to_owned());
        Ok(())
    }

    fn print_to(&self, file: &Path, printer: &str) -> Result<()> {
        if let Some(delay) = self.print_delay {
            std::thread::sleep(delay);
        }
        self.record(PrintCall::PrintTo {
            file: file.to_path_buf(),
            printer: printer.to_owned(),
        });
        if let Some(reason) = &self.fail_print {
            return Err(PrintdropError::InvocationFailed(reason.clone()));
        }
        info!(printer, file = %file.display(), "simulated print accepted");
        Ok(())
    }
}
