// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print dispatcher — routes one stored document to the configured printer.
//
// Per call:
//
//   Start -> Enumerating -> NoMatch                                  (fail)
//                        -> Matched -> SettingDefault -> Invoking -> Invoked (ok)
//                                                               \-> Failed   (fail)
//
// Every terminal state is reached in a single pass; nothing is retried.
//
// The default printer is host-wide state.  Two uploads racing through
// set-default and invoke could each print on the other's printer, so the
// whole sequence runs under one gate and dispatches are strictly serialized.
// A call that outlives its acknowledgement window still holds the gate until
// it returns, so the next dispatch never overlaps it.
//
// The print action is one-way: the OS acknowledges that it accepted the
// request, and we wait at most `ack_timeout` for that acknowledgement.  A
// `Success` result never means the pages came out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::types::{DispatchResult, PrintJobTarget};

use crate::matcher::PrinterMatcher;
use crate::system::PrintSystem;

/// States a single dispatch moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Start,
    Enumerating,
    NoMatch,
    Matched,
    SettingDefault,
    Invoking,
    Invoked,
    Failed,
}

impl DispatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NoMatch | Self::Invoked | Self::Failed)
    }
}

/// Sends stored documents to the first printer whose name matches.
pub struct PrintDispatcher {
    system: Arc<dyn PrintSystem>,
    matcher: PrinterMatcher,
    ack_timeout: Duration,
    /// Serializes enumerate, set-default and invoke across requests.
    gate: Arc<Mutex<()>>,
}

impl PrintDispatcher {
    pub fn new(system: Arc<dyn PrintSystem>, matcher: PrinterMatcher, ack_timeout: Duration) -> Self {
        Self {
            system,
            matcher,
            ack_timeout,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn matcher(&self) -> &PrinterMatcher {
        &self.matcher
    }

    pub fn platform_name(&self) -> &str {
        self.system.platform_name()
    }

    /// Print `target` on the matching printer.
    ///
    /// Only `stored_path` is used; the extension matters to the OS file
    /// association, not to us.  Failures are logged and folded into the
    /// returned reason.
    #[instrument(
        skip_all,
        fields(stored_name = %target.stored_name, document_hash = %target.document_hash)
    )]
    pub async fn dispatch(&self, target: &PrintJobTarget) -> DispatchResult {
        // Shared with every blocking call made below; the gate opens once the
        // dispatch and all of its calls have finished.
        let turn = Arc::new(Arc::clone(&self.gate).lock_owned().await);
        let mut state = DispatchState::Start;

        advance(&mut state, DispatchState::Enumerating);
        // Enumerated fresh every time so printers added or removed between
        // uploads are seen immediately.
        let printers = match self.blocking(&turn, |system| system.list_printers()).await {
            Ok(printers) => printers,
            Err(e) => {
                advance(&mut state, DispatchState::Failed);
                warn!(error = %e, "printer enumeration failed");
                return DispatchResult::enumeration_failed();
            }
        };

        let Some(printer) = self
            .matcher
            .select(&printers)
            .map(|record| record.display_name.clone())
        else {
            advance(&mut state, DispatchState::NoMatch);
            info!(
                pattern = self.matcher.pattern(),
                available = printers.len(),
                "no printer matches"
            );
            return DispatchResult::no_matching_printer();
        };
        advance(&mut state, DispatchState::Matched);
        debug!(printer = %printer, "printer matched");

        advance(&mut state, DispatchState::SettingDefault);
        let name = printer.clone();
        if let Err(e) = self
            .blocking(&turn, move |system| system.set_default_printer(&name))
            .await
        {
            advance(&mut state, DispatchState::Failed);
            warn!(printer = %printer, error = %e, "setting default printer failed");
            return DispatchResult::invocation_failed(printer);
        }

        advance(&mut state, DispatchState::Invoking);
        let name = printer.clone();
        let path = target.stored_path.clone();
        match self
            .blocking(&turn, move |system| system.print_to(&path, &name))
            .await
        {
            Ok(()) => {
                advance(&mut state, DispatchState::Invoked);
                info!(printer = %printer, "print action accepted");
                DispatchResult::success(printer)
            }
            Err(e) => {
                advance(&mut state, DispatchState::Failed);
                warn!(printer = %printer, error = %e, "print action failed");
                DispatchResult::invocation_failed(printer)
            }
        }
    }

    /// Run a blocking print-system call, waiting at most `ack_timeout`.
    ///
    /// A call that outlives the window keeps running on its blocking thread;
    /// it cannot be cancelled, only stopped being waited for.  It keeps its
    /// share of `turn` until it returns.
    async fn blocking<T, F>(&self, turn: &Arc<OwnedMutexGuard<()>>, op: F) -> Result<T>
    where
        F: FnOnce(&dyn PrintSystem) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let system = Arc::clone(&self.system);
        let held = Arc::clone(turn);
        let task = tokio::task::spawn_blocking(move || {
            let result = op(system.as_ref());
            drop(held);
            result
        });

        match tokio::time::timeout(self.ack_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(PrintdropError::InvocationFailed(format!(
                "print system call panicked: {join}"
            ))),
            Err(_) => Err(PrintdropError::InvocationFailed(format!(
                "no acknowledgement within {}s",
                self.ack_timeout.as_secs_f32()
            ))),
        }
    }
}

fn advance(state: &mut DispatchState, next: DispatchState) {
    debug_assert!(
        !state.is_terminal(),
        "dispatch already finished in {state:?}, cannot move to {next:?}"
    );
    debug!(from = ?*state, to = ?next, "dispatch state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use printdrop_core::types::DispatchReason;

    use crate::memory::{MemoryPrintSystem, PrintCall};

    fn target(path: &str) -> PrintJobTarget {
        PrintJobTarget {
            stored_path: PathBuf::from(path),
            stored_name: path.rsplit('/').next().unwrap_or(path).to_owned(),
            extension: "pdf".into(),
            document_hash: "00".into(),
            size_bytes: 1,
        }
    }

    fn dispatcher(system: Arc<MemoryPrintSystem>, pattern: &str) -> PrintDispatcher {
        PrintDispatcher::new(
            system,
            PrinterMatcher::new(pattern).unwrap(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn matching_printer_becomes_default_and_prints() {
        let system = Arc::new(MemoryPrintSystem::with_printers([
            "Microsoft XPS",
            "HP LaserJet P1007 Series",
        ]));
        let dispatcher = dispatcher(system.clone(), "HP LASERJET P1007");

        let result = dispatcher.dispatch(&target("temple/a.pdf")).await;

        assert_eq!(result, DispatchResult::success("HP LaserJet P1007 Series"));
        assert_eq!(
            system.calls(),
            [
                PrintCall::ListPrinters,
                PrintCall::SetDefault("HP LaserJet P1007 Series".into()),
                PrintCall::PrintTo {
                    file: "temple/a.pdf".into(),
                    printer: "HP LaserJet P1007 Series".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn no_match_leaves_default_untouched() {
        let system = Arc::new(MemoryPrintSystem::with_printers(["Microsoft XPS", "Fax"]));
        let dispatcher = dispatcher(system.clone(), "HP LaserJet P1007");

        let result = dispatcher.dispatch(&target("temple/a.pdf")).await;

        assert!(!result.succeeded);
        assert_eq!(result.reason, DispatchReason::NoMatchingPrinter);
        assert_eq!(system.default_printer(), None);
        assert_eq!(system.calls(), [PrintCall::ListPrinters]);
    }

    #[tokio::test]
    async fn first_of_two_matches_is_used() {
        let system = Arc::new(MemoryPrintSystem::with_printers([
            "HP LaserJet P1007 (1)",
            "HP LaserJet P1007 (2)",
        ]));
        let dispatcher = dispatcher(system.clone(), "HP LaserJet P1007");

        for _ in 0..2 {
            let result = dispatcher.dispatch(&target("temple/a.pdf")).await;
            assert_eq!(result.printer.as_deref(), Some("HP LaserJet P1007 (1)"));
        }
        assert_eq!(system.default_printer().as_deref(), Some("HP LaserJet P1007 (1)"));
    }

    #[tokio::test]
    async fn print_failure_is_invocation_failed() {
        let system = Arc::new(
            MemoryPrintSystem::with_printers(["HP LaserJet P1007"])
                .failing_print("no application associated"),
        );
        let dispatcher = dispatcher(system.clone(), "HP LaserJet P1007");

        let result = dispatcher.dispatch(&target("temple/a.docx")).await;

        assert_eq!(result, DispatchResult::invocation_failed("HP LaserJet P1007"));
    }

    #[tokio::test]
    async fn enumeration_failure_has_its_own_reason() {
        let system = Arc::new(
            MemoryPrintSystem::with_printers(["HP LaserJet P1007"]).failing_enumeration("spooler"),
        );
        let dispatcher = dispatcher(system.clone(), "HP LaserJet P1007");

        let result = dispatcher.dispatch(&target("temple/a.pdf")).await;

        assert_eq!(result.reason, DispatchReason::EnumerationFailed);
        assert_eq!(system.default_printer(), None);
    }

    #[tokio::test]
    async fn slow_acknowledgement_times_out() {
        let system = Arc::new(
            MemoryPrintSystem::with_printers(["HP LaserJet P1007"])
                .slow_print(Duration::from_millis(500)),
        );
        let dispatcher = PrintDispatcher::new(
            system,
            PrinterMatcher::new("HP LaserJet P1007").unwrap(),
            Duration::from_millis(50),
        );

        let result = dispatcher.dispatch(&target("temple/a.pdf")).await;

        assert_eq!(result.reason, DispatchReason::InvocationFailed);
    }

    #[tokio::test]
    async fn set_default_failure_stops_before_printing() {
        let system = Arc::new(
            MemoryPrintSystem::with_printers(["HP LaserJet P1007"])
                .failing_default("access denied"),
        );
        let dispatcher = dispatcher(system.clone(), "HP LaserJet P1007");

        let result = dispatcher.dispatch(&target("temple/a.pdf")).await;

        assert_eq!(result, DispatchResult::invocation_failed("HP LaserJet P1007"));
        assert_eq!(
            system.calls(),
            [
                PrintCall::ListPrinters,
                PrintCall::SetDefault("HP LaserJet P1007".into()),
            ]
        );
        assert_eq!(system.default_printer(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn timed_out_call_keeps_the_next_dispatch_waiting() {
        let system = Arc::new(
            MemoryPrintSystem::with_printers(["HP LaserJet P1007"])
                .slow_print(Duration::from_millis(300)),
        );
        let dispatcher = Arc::new(PrintDispatcher::new(
            system.clone(),
            PrinterMatcher::new("HP LaserJet P1007").unwrap(),
            Duration::from_millis(50),
        ));

        let first = {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move { dispatcher.dispatch(&target("temple/a.pdf")).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move { dispatcher.dispatch(&target("temple/b.pdf")).await })
        };

        assert_eq!(first.await.unwrap().reason, DispatchReason::InvocationFailed);
        assert_eq!(second.await.unwrap().reason, DispatchReason::InvocationFailed);

        // Wait for the second print, still running past its window.
        drop(dispatcher.gate.lock().await);

        assert_eq!(
            system.calls(),
            [
                PrintCall::ListPrinters,
                PrintCall::SetDefault("HP LaserJet P1007".into()),
                PrintCall::PrintTo {
                    file: "temple/a.pdf".into(),
                    printer: "HP LaserJet P1007".into()
                },
                PrintCall::ListPrinters,
                PrintCall::SetDefault("HP LaserJet P1007".into()),
                PrintCall::PrintTo {
                    file: "temple/b.pdf".into(),
                    printer: "HP LaserJet P1007".into()
                },
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_dispatches_do_not_interleave() {
        let system = Arc::new(
            MemoryPrintSystem::with_printers(["HP LaserJet P1007"])
                .slow_print(Duration::from_millis(20)),
        );
        let dispatcher = Arc::new(dispatcher(system.clone(), "HP LaserJet P1007"));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    dispatcher
                        .dispatch(&target(&format!("temple/{i}.pdf")))
                        .await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().succeeded);
        }

        // Each dispatch must appear as an unbroken list/set/print triple.
        let calls = system.calls();
        assert_eq!(calls.len(), 12);
        for chunk in calls.chunks(3) {
            assert_eq!(chunk[0], PrintCall::ListPrinters);
            assert!(matches!(chunk[1], PrintCall::SetDefault(_)));
            assert!(matches!(chunk[2], PrintCall::PrintTo { .. }));
        }
    }

    #[test]
    fn terminal_states() {
        assert!(DispatchState::NoMatch.is_terminal());
        assert!(DispatchState::Invoked.is_terminal());
        assert!(DispatchState::Failed.is_terminal());
        assert!(!DispatchState::Invoking.is_terminal());
    }
}
