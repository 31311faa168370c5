// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload store — validates an upload and writes it into the flat storage
// directory without ever replacing an existing file.
//
// Files are created with `create_new`, so two uploads that share a timestamp
// and a sanitized stem get distinct names instead of silently overwriting
// each other. Nothing here deletes uploads; the directory grows until an
// operator cleans it.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, instrument, warn};

use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::types::{PrintJobTarget, UploadRequest};

use crate::integrity::hash_bytes;
use crate::naming::{ValidatedName, stored_file_name, validate_upload_name};

/// Counter suffixes tried before giving up on a name.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Intake validator bound to one storage directory.
#[derive(Debug, Clone)]
pub struct UploadIntake {
    dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadIntake {
    /// Open the store, creating the storage directory if it does not exist.
    ///
    /// `allowed_extensions` must be lowercase without the leading dot.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>, allowed_extensions: Vec<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!("upload storage ready");
        Ok(Self {
            dir,
            allowed_extensions,
        })
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an upload, stamping it with the local time.
    ///
    /// `None` means the form carried no file at all.
    pub fn accept(&self, upload: Option<UploadRequest>) -> Result<PrintJobTarget> {
        self.accept_at(upload, Local::now().naive_local())
    }

    /// Same as [`accept`](Self::accept) with an explicit timestamp.
    ///
    /// Rejections (`NoFileSupplied`, `EmptyFilename`, `DisallowedExtension`)
    /// happen before any file system access.
    pub fn accept_at(
        &self,
        upload: Option<UploadRequest>,
        now: NaiveDateTime,
    ) -> Result<PrintJobTarget> {
        let upload = upload.ok_or(PrintdropError::NoFileSupplied)?;
        let name = validate_upload_name(&upload.original_filename, &self.allowed_extensions)
            .inspect_err(|e| {
                info!(original = %upload.original_filename, error = %e, "upload rejected");
            })?;

        let (stored_path, stored_name) = self.persist(&name, &now, &upload.content)?;
        let target = PrintJobTarget {
            stored_path,
            stored_name,
            extension: name.extension,
            document_hash: hash_bytes(&upload.content),
            size_bytes: upload.content.len() as u64,
        };

        info!(
            stored_name = %target.stored_name,
            kind = ?target.kind(),
            document_hash = %target.document_hash,
            size = target.size_bytes,
            "upload stored"
        );
        Ok(target)
    }

    /// Write `content` under the first free name for `name` at `now`.
    fn persist(
        &self,
        name: &ValidatedName,
        now: &NaiveDateTime,
        content: &[u8],
    ) -> Result<(PathBuf, String)> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let stored_name = stored_file_name(now, name, attempt);
            let path = self.dir.join(&stored_name);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(stored_name = %stored_name, "name taken, trying next suffix");
                    continue;
                }
                Err(source) => return Err(PrintdropError::PersistFailure { path, source }),
            };

            if let Err(source) = file.write_all(content).and_then(|()| file.sync_all()) {
                // Leave no truncated document behind for a later print.
                drop(file);
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "failed to remove partial upload");
                }
                return Err(PrintdropError::PersistFailure { path, source });
            }

            return Ok((path, stored_name));
        }

        Err(PrintdropError::PersistFailure {
            path: self.dir.join(stored_file_name(now, name, 0)),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{MAX_NAME_ATTEMPTS} candidate names already taken"),
            ),
        })
    }
}
