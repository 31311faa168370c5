// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the printdrop upload-and-print pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier attached to one upload request, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file received from the upload form. Lives for one request only.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Name as reported by the client. Untrusted; may be empty or contain
    /// arbitrary Unicode, separators and traversal sequences.
    pub original_filename: String,
    pub content: Vec<u8>,
}

impl UploadRequest {
    pub fn new(original_filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            original_filename: original_filename.into(),
            content: content.into(),
        }
    }
}

/// Document families accepted for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    /// Word documents (`doc`, `docx`), rendered by the associated office suite.
    Word,
}

impl DocumentKind {
    /// Infer the document kind from a lowercase extension without the dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Word),
            _ => None,
        }
    }
}

/// A persisted upload, ready to be handed to the print dispatcher once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintJobTarget {
    /// Full path of the stored file inside the storage directory.
    pub stored_path: PathBuf,
    /// File name component of `stored_path`.
    pub stored_name: String,
    /// Lowercase extension without the leading dot.
    pub extension: String,
    /// SHA-256 of the stored bytes, lowercase hex.
    pub document_hash: String,
    pub size_bytes: u64,
}

impl PrintJobTarget {
    /// Document family, by extension.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_extension(&self.extension)
    }
}

/// A printer registered on the host, as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrinterRecord {
    /// Case-sensitive display name.
    pub display_name: String,
}

impl PrinterRecord {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// Why a dispatch ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchReason {
    /// The OS accepted the print action. Says nothing about the paper.
    Success,
    /// No enumerated printer matched the configured name.
    NoMatchingPrinter,
    /// Setting the default printer or invoking the print action failed, or
    /// did not acknowledge in time.
    InvocationFailed,
    /// The printer list could not be read from the OS.
    EnumerationFailed,
}

impl DispatchReason {
    /// Stable kebab-case code, used in the outcome response header.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success => "printed",
            Self::NoMatchingPrinter => "no-matching-printer",
            Self::InvocationFailed => "invocation-failed",
            Self::EnumerationFailed => "enumeration-failed",
        }
    }
}

/// Outcome of one dispatch attempt. Returned to the caller and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub succeeded: bool,
    pub reason: DispatchReason,
    /// The matched printer, when matching got that far.
    pub printer: Option<String>,
}

impl DispatchResult {
    pub fn success(printer: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            reason: DispatchReason::Success,
            printer: Some(printer.into()),
        }
    }

    pub fn no_matching_printer() -> Self {
        Self {
            succeeded: false,
            reason: DispatchReason::NoMatchingPrinter,
            printer: None,
        }
    }

    pub fn enumeration_failed() -> Self {
        Self {
            succeeded: false,
            reason: DispatchReason::EnumerationFailed,
            printer: None,
        }
    }

    pub fn invocation_failed(printer: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            reason: DispatchReason::InvocationFailed,
            printer: Some(printer.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_kind_from_extension_ignores_case() {
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("Docx"), Some(DocumentKind::Word));
        assert_eq!(DocumentKind::from_extension("doc"), Some(DocumentKind::Word));
        assert_eq!(DocumentKind::from_extension("exe"), None);
    }

    #[test]
    fn dispatch_result_constructors_set_flags() {
        let ok = DispatchResult::success("HP LaserJet P1007");
        assert!(ok.succeeded);
        assert_eq!(ok.reason, DispatchReason::Success);

        let miss = DispatchResult::no_matching_printer();
        assert!(!miss.succeeded);
        assert_eq!(miss.printer, None);

        let failed = DispatchResult::invocation_failed("HP LaserJet P1007");
        assert!(!failed.succeeded);
        assert_eq!(failed.reason.code(), "invocation-failed");
    }
}
