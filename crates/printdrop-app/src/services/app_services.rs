// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the intake and the dispatcher and runs one
// upload end to end for the HTTP handlers.
//
// Intake does blocking file I/O, so it runs on the blocking pool.  Dispatch
// serializes itself; handlers can call `upload_and_print` concurrently.

use std::sync::Arc;

use printdrop_core::AppConfig;
use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::human_errors::{HumanMessage, humanize_dispatch, humanize_error};
use printdrop_core::types::{DispatchResult, PrintJobTarget, RequestId, UploadRequest};
use printdrop_intake::UploadIntake;
use printdrop_print::{PrintDispatcher, PrintSystem, PrinterMatcher, print_system_for};
use tracing::{Instrument, Span, error, info, info_span};

/// What happened to one upload.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Nothing was printed because the file was not stored.
    NotStored(PrintdropError),
    /// The file was stored and handed to the dispatcher.
    Dispatched {
        target: PrintJobTarget,
        result: DispatchResult,
    },
}

impl UploadOutcome {
    /// Stable code for the outcome header.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotStored(err) => err.code(),
            Self::Dispatched { result, .. } => result.reason.code(),
        }
    }

    /// Name the file was stored under, if it was stored.
    pub fn stored_name(&self) -> Option<&str> {
        match self {
            Self::NotStored(_) => None,
            Self::Dispatched { target, .. } => Some(&target.stored_name),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Dispatched { result, .. } if result.succeeded)
    }

    pub fn human(&self, pattern: &str) -> HumanMessage {
        match self {
            Self::NotStored(err) => humanize_error(err),
            Self::Dispatched { result, .. } => humanize_dispatch(result, pattern),
        }
    }
}

/// Shared services handed to every request through axum state.
///
/// Arc-wrapped so the router can clone it per request.
#[derive(Clone)]
pub struct AppServices {
    intake: Arc<UploadIntake>,
    dispatcher: Arc<PrintDispatcher>,
    config: Arc<AppConfig>,
}

impl AppServices {
    /// Initialise with the print system selected by `config.print_backend`.
    pub fn init(config: AppConfig) -> Result<Self> {
        let system = print_system_for(&config);
        Self::with_print_system(config, system)
    }

    /// Initialise against an explicit print system.
    pub fn with_print_system(config: AppConfig, system: Arc<dyn PrintSystem>) -> Result<Self> {
        config.validate()?;
        let intake = UploadIntake::open(&config.storage_dir, config.allowed_extensions.clone())?;
        let matcher = PrinterMatcher::new(config.printer_match.as_str())?;
        let dispatcher = PrintDispatcher::new(system, matcher, config.print_ack_timeout());

        info!(
            storage = %intake.dir().display(),
            printer_match = dispatcher.matcher().pattern(),
            backend = dispatcher.platform_name(),
            "app services initialised"
        );

        Ok(Self {
            intake: Arc::new(intake),
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &PrintDispatcher {
        &self.dispatcher
    }

    /// Validate and store `upload`, then print it.
    ///
    /// The document is printed only if it was stored, and stays stored
    /// whatever the dispatcher reports.
    pub async fn upload_and_print(&self, upload: Option<UploadRequest>) -> UploadOutcome {
        let span = info_span!("upload", request_id = %RequestId::new());
        self.run_upload(upload).instrument(span).await
    }

    async fn run_upload(&self, upload: Option<UploadRequest>) -> UploadOutcome {
        let original = upload
            .as_ref()
            .map(|u| u.original_filename.clone())
            .unwrap_or_default();

        let intake = Arc::clone(&self.intake);
        let span = Span::current();
        let stored = match tokio::task::spawn_blocking(move || span.in_scope(|| intake.accept(upload))).await {
            Ok(stored) => stored,
            Err(join) => Err(PrintdropError::Io(std::io::Error::other(join))),
        };

        // The intake logs its own rejections and successes.
        let target = match stored {
            Ok(target) => target,
            Err(err) => {
                if !err.is_rejection() {
                    error!(original = %original, error = %err, "upload could not be stored");
                }
                return UploadOutcome::NotStored(err);
            }
        };

        let result = self.dispatcher.dispatch(&target).await;
        info!(
            stored = %target.stored_name,
            outcome = result.reason.code(),
            printer = result.printer.as_deref().unwrap_or("-"),
            "upload finished"
        );
        UploadOutcome::Dispatched { target, result }
    }
}
