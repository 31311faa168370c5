// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for printdrop.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all printdrop operations.
#[derive(Debug, Error)]
pub enum PrintdropError {
    // -- Intake errors --
    #[error("no file was supplied with the upload")]
    NoFileSupplied,

    #[error("the uploaded file has an empty name")]
    EmptyFilename,

    #[error("file extension not allowed: {0:?}")]
    DisallowedExtension(String),

    #[error("failed to store upload at {}: {source}", path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Print errors --
    #[error("no printer name contains {pattern:?}")]
    NoMatchingPrinter { pattern: String },

    #[error("print invocation failed: {0}")]
    InvocationFailed(String),

    #[error("printer enumeration failed: {0}")]
    PrinterEnumeration(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("printing is not available on this platform")]
    PlatformUnavailable,
}

impl PrintdropError {
    /// Stable kebab-case code, used in the outcome response header.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoFileSupplied => "no-file",
            Self::EmptyFilename => "empty-filename",
            Self::DisallowedExtension(_) => "disallowed-extension",
            Self::PersistFailure { .. } => "persist-failed",
            Self::NoMatchingPrinter { .. } => "no-matching-printer",
            Self::InvocationFailed(_) => "invocation-failed",
            Self::PrinterEnumeration(_) => "enumeration-failed",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::PlatformUnavailable => "platform-unavailable",
        }
    }

    /// Whether the error was caused by what the uploader sent, as opposed to
    /// a fault on the host.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NoFileSupplied | Self::EmptyFilename | Self::DisallowedExtension(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintdropError>;
