// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blocking runner for the host's print tools.

use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Why a host tool did not produce usable output.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

impl CommandError {
    /// Standard error of a tool that ran and failed, empty otherwise.
    pub fn stderr(&self) -> &str {
        match self {
            Self::Failed { stderr, .. } => stderr,
            Self::Spawn { .. } => "",
        }
    }
}

/// Run `cmd` to completion and return its standard output.
///
/// Standard input is closed so a tool that prompts fails instead of hanging.
pub fn run(mut cmd: Command) -> Result<String, CommandError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!(program = %program, "running print tool");

    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            program,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Non-empty, trimmed lines of a tool's output, in order.
pub fn output_lines(stdout: &str) -> impl Iterator<Item = &str> {
    stdout.lines().map(str::trim).filter(|line| !line.is_empty())
}
