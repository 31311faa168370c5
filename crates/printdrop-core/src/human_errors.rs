// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable status messages for the person standing at the upload page.
//
// Every intake error and dispatch outcome is mapped to plain language with a
// clear suggestion. The uploader never sees a stack trace or an OS error code.

use crate::error::PrintdropError;
use crate::types::{DispatchReason, DispatchResult};

/// How the message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The print action was handed to the host.
    Done,
    /// The uploader can fix it (pick another file, rename it).
    ActionRequired,
    /// Someone with access to the host has to look at it.
    HostProblem,
}

/// A human-readable status with plain language message and suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanMessage {
    /// Shown as the heading.
    pub message: String,
    /// Shown as body text.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `PrintdropError` into a message the uploader can act on.
pub fn humanize_error(err: &PrintdropError) -> HumanMessage {
    match err {
        // -- Intake --
        PrintdropError::NoFileSupplied => HumanMessage {
            message: "No file was received.".into(),
            suggestion: "Choose the file you want to print, then press Upload and print again.".into(),
            severity: Severity::ActionRequired,
        },

        PrintdropError::EmptyFilename => HumanMessage {
            message: "The file name is empty.".into(),
            suggestion: "Choose the file again. If it has no name, rename it first.".into(),
            severity: Severity::ActionRequired,
        },

        PrintdropError::DisallowedExtension(_) => HumanMessage {
            message: "This type of file can't be printed here.".into(),
            suggestion: "Only doc, docx and pdf files are accepted. Save the document as a PDF and try again.".into(),
            severity: Severity::ActionRequired,
        },

        PrintdropError::PersistFailure { .. } => HumanMessage {
            message: "The file couldn't be saved on the print computer.".into(),
            suggestion: "Try again. If this keeps happening, the print computer's disk may be full; please contact the administrator.".into(),
            severity: Severity::HostProblem,
        },

        // -- Print --
        PrintdropError::NoMatchingPrinter { pattern } => HumanMessage {
            message: format!("The printer [{pattern}] was not found."),
            suggestion: "Check that the printer is switched on and connected, then contact the administrator.".into(),
            severity: Severity::HostProblem,
        },

        PrintdropError::InvocationFailed(_) => invocation_failed(),

        PrintdropError::PrinterEnumeration(_) | PrintdropError::PlatformUnavailable => {
            enumeration_failed()
        }

        // -- Host --
        PrintdropError::Config(_) | PrintdropError::Io(_) | PrintdropError::Serialization(_) => {
            HumanMessage {
                message: "The print service had an internal problem.".into(),
                suggestion: "Try again. If this keeps happening, please contact the administrator.".into(),
                severity: Severity::HostProblem,
            }
        }
    }
}

/// Convert a dispatch outcome into the status shown after an upload.
///
/// `pattern` is the configured printer name, named in the not-found message.
pub fn humanize_dispatch(result: &DispatchResult, pattern: &str) -> HumanMessage {
    match result.reason {
        DispatchReason::Success => HumanMessage {
            message: "The print job has been sent.".into(),
            suggestion: match result.printer.as_deref() {
                Some(printer) => format!("Collect your pages from {printer}. Large documents can take a minute."),
                None => "Collect your pages from the printer. Large documents can take a minute.".into(),
            },
            severity: Severity::Done,
        },
        DispatchReason::NoMatchingPrinter => humanize_error(&PrintdropError::NoMatchingPrinter {
            pattern: pattern.to_owned(),
        }),
        DispatchReason::InvocationFailed => invocation_failed(),
        DispatchReason::EnumerationFailed => enumeration_failed(),
    }
}

fn invocation_failed() -> HumanMessage {
    HumanMessage {
        message: "The print computer couldn't start printing this file.".into(),
        suggestion: "The file was saved but not printed. Please contact the administrator.".into(),
        severity: Severity::HostProblem,
    }
}

fn enumeration_failed() -> HumanMessage {
    HumanMessage {
        message: "The print computer couldn't list its printers.".into(),
        suggestion: "The file was saved but not printed. Please contact the administrator.".into(),
        severity: Severity::HostProblem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_action_required() {
        for err in [
            PrintdropError::NoFileSupplied,
            PrintdropError::EmptyFilename,
            PrintdropError::DisallowedExtension("exe".into()),
        ] {
            assert!(err.is_rejection());
            assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
        }
    }

    #[test]
    fn persist_failure_is_host_problem() {
        let err = PrintdropError::PersistFailure {
            path: "temple/x.pdf".into(),
            source: std::io::Error::other("disk full"),
        };
        assert!(!err.is_rejection());
        assert_eq!(humanize_error(&err).severity, Severity::HostProblem);
    }

    #[test]
    fn not_found_names_the_printer() {
        let human = humanize_dispatch(&DispatchResult::no_matching_printer(), "HP LaserJet P1007");
        assert!(human.message.contains("HP LaserJet P1007"));
        assert_eq!(human.severity, Severity::HostProblem);
    }

    #[test]
    fn not_found_and_invocation_failure_read_differently() {
        let missing = humanize_dispatch(&DispatchResult::no_matching_printer(), "HP");
        let failed = humanize_dispatch(&DispatchResult::invocation_failed("HP 1"), "HP");
        assert_ne!(missing.message, failed.message);
    }

    #[test]
    fn success_mentions_the_matched_printer() {
        let human = humanize_dispatch(&DispatchResult::success("HP LaserJet P1007 Series"), "HP");
        assert_eq!(human.severity, Severity::Done);
        assert!(human.suggestion.contains("HP LaserJet P1007 Series"));
    }
}
