// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload name validation and the stored-name scheme.
//
// Stored names look like `20260119093015_数字图像处理.docx`: a second-resolution
// local timestamp, the sanitized stem of the uploaded name, and the lowercase
// extension. When that name is already taken a counter is appended to the
// stem (`..._数字图像处理-1.docx`).

use chrono::NaiveDateTime;
use printdrop_core::error::{PrintdropError, Result};

use crate::sanitize::sanitize_component;

/// Stem used when sanitization leaves nothing.
pub const PLACEHOLDER_STEM: &str = "file";

/// `strftime` pattern of the stored-name prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// An upload name that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedName {
    /// Sanitized stem, never empty.
    pub stem: String,
    /// Lowercase extension without the dot, always in the allow-list.
    pub extension: String,
}

/// Split `original` on its last `.` into stem and extension.
///
/// A name without a dot has an empty extension.
pub fn split_upload_name(original: &str) -> (&str, &str) {
    original.rsplit_once('.').unwrap_or((original, ""))
}

/// Validate an untrusted upload name against the allowed extensions.
///
/// Has no side effects. `allowed` must hold lowercase extensions without the
/// leading dot.
pub fn validate_upload_name(original: &str, allowed: &[String]) -> Result<ValidatedName> {
    let name = original.trim();
    if name.is_empty() {
        return Err(PrintdropError::EmptyFilename);
    }

    let (stem, extension) = split_upload_name(name);
    let extension = extension.to_lowercase();
    if !allowed.iter().any(|ext| *ext == extension) {
        return Err(PrintdropError::DisallowedExtension(extension));
    }

    let stem = match sanitize_component(stem) {
        s if s.is_empty() => PLACEHOLDER_STEM.to_owned(),
        s => s,
    };

    Ok(ValidatedName { stem, extension })
}

/// Build the stored file name for the given attempt.
///
/// Attempt 0 is the plain `<timestamp>_<stem>.<ext>`; later attempts add
/// `-<attempt>` to the stem.
pub fn stored_file_name(timestamp: &NaiveDateTime, name: &ValidatedName, attempt: u32) -> String {
    let ts = timestamp.format(TIMESTAMP_FORMAT);
    if attempt == 0 {
        format!("{ts}_{}.{}", name.stem, name.extension)
    } else {
        format!("{ts}_{}-{attempt}.{}", name.stem, name.extension)
    }
}
