// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for printsock.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A printer character device found on this machine (e.g. `/dev/usb/lp0`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrinterDevice {
    pub path: PathBuf,
}

impl PrinterDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for PrinterDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// The two kinds of systemd unit we generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    /// Listening socket, one per installation.
    Socket,
    /// Template service, instantiated once per accepted connection.
    Service,
}

impl UnitKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Socket => "Socket",
            Self::Service => "Service",
        }
    }
}

/// A rendered unit file, ready to be written into the unit directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFile {
    pub kind: UnitKind,
    /// File name inside the unit directory (e.g. `escpos-printer.socket`).
    pub file_name: String,
    pub contents: String,
}

/// Progress notifications emitted while provisioning.
///
/// The binary turns these into the check-marked lines the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    UnitWritten { kind: UnitKind, path: PathBuf },
    UnitUnchanged { kind: UnitKind, path: PathBuf },
    UnitRemoved { path: PathBuf },
    CommandStarted { command: String },
    CommandSucceeded { command: String },
}
