// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use printdrop_core::AppConfig;
use printdrop_core::error::{PrintdropError, Result};
use tracing::info;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PRINTDROP_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "printdrop.json";

/// Where the config comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by `PRINTDROP_CONFIG`; must exist.
    Explicit(PathBuf),
    /// `printdrop.json` next to the process; optional.
    WorkingDir(PathBuf),
}

/// Pick the config source from the environment value and working directory.
pub fn resolve(env_value: Option<OsString>, cwd: &Path) -> ConfigSource {
    match env_value.filter(|v| !v.is_empty()) {
        Some(path) => ConfigSource::Explicit(PathBuf::from(path)),
        None => ConfigSource::WorkingDir(cwd.join(DEFAULT_CONFIG_FILE)),
    }
}

/// Load the effective configuration for this process.
pub fn load_config() -> Result<AppConfig> {
    let cwd = std::env::current_dir()?;
    load_from_source(&resolve(std::env::var_os(CONFIG_ENV), &cwd))
}

pub fn load_from_source(source: &ConfigSource) -> Result<AppConfig> {
    match source {
        ConfigSource::Explicit(path) => {
            if !path.is_file() {
                return Err(PrintdropError::Config(format!(
                    "{CONFIG_ENV} points at {}, which is not a file",
                    path.display()
                )));
            }
            info!(path = %path.display(), "loading config");
            AppConfig::load_from(path)
        }
        ConfigSource::WorkingDir(path) if path.is_file() => {
            info!(path = %path.display(), "loading config");
            AppConfig::load_from(path)
        }
        ConfigSource::WorkingDir(_) => {
            info!("no config file, using defaults");
            let config = AppConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
