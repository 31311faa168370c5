// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printdrop Print — finds the target printer by name and hands a stored
// document to the host's own print action.  The OS facilities sit behind the
// `PrintSystem` trait; the dispatcher owns the matching policy and the
// default-printer handling.

pub mod command;
pub mod cups;
pub mod dispatcher;
pub mod matcher;
pub mod memory;
pub mod shell;
pub mod system;

pub use dispatcher::PrintDispatcher;
pub use matcher::PrinterMatcher;
pub use memory::MemoryPrintSystem;
pub use system::{PrintSystem, print_system_for};
