// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printdrop Intake — turns an untrusted upload into a safely named file in
// the storage directory, or rejects it before anything touches the disk.

pub mod integrity;
pub mod naming;
pub mod sanitize;
pub mod store;

pub use naming::{ValidatedName, validate_upload_name};
pub use sanitize::sanitize_component;
pub use store::UploadIntake;
