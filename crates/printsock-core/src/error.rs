// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for printsock.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all printsock operations.
#[derive(Debug, Error)]
pub enum PrintsockError {
    // -- Privilege --
    #[error("this program must be run as root or with sudo")]
    NotRoot,

    // -- Device discovery / selection --
    #[error("printer discovery failed: {0}")]
    Discovery(String),

    #[error("no USB printers found matching {pattern}")]
    NoPrintersFound { pattern: String },

    #[error("invalid printer device {}: {reason}", path.display())]
    InvalidDevice { path: PathBuf, reason: String },

    #[error("printer selection aborted: no more input")]
    SelectionAborted,

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Unit files --
    #[error("failed to write unit file {}: {source}", path.display())]
    UnitWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- External commands --
    #[error("failed to run '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command '{command}' failed ({status})\noutput: {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    // -- Generic I/O / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintsockError>;
