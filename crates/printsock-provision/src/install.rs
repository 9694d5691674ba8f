// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writing and removing unit files in the unit directory.

use std::fs::{OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use printsock_core::error::{PrintsockError, Result};
use printsock_core::types::UnitFile;

/// Permission bits for unit files (rw-r--r--).
pub const UNIT_MODE: u32 = 0o644;

/// What `write_unit` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The file already had exactly these contents.
    Unchanged(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(p) | Self::Unchanged(p) => p,
        }
    }
}

/// Write `unit` into `dir` with mode 0644.
///
/// The contents go to a hidden sibling first and are renamed into place, so
/// systemd never reads a half-written unit.
#[instrument(skip(dir, unit), fields(dir = %dir.display(), file = %unit.file_name))]
pub fn write_unit(dir: &Path, unit: &UnitFile) -> Result<WriteOutcome> {
    let path = dir.join(&unit.file_name);
    let write_err = |source: std::io::Error| PrintsockError::UnitWrite {
        path: path.clone(),
        source,
    };

    if let Ok(existing) = std::fs::read(&path) {
        if existing == unit.contents.as_bytes() {
            std::fs::set_permissions(&path, Permissions::from_mode(UNIT_MODE))
                .map_err(write_err)?;
            debug!("unit unchanged");
            return Ok(WriteOutcome::Unchanged(path));
        }
    }

    let tmp = dir.join(format!(".{}.tmp", unit.file_name));
    let result = write_then_rename(&tmp, &path, unit.contents.as_bytes());
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_err(e));
    }

    info!(path = %path.display(), "unit file written");
    Ok(WriteOutcome::Written(path))
}

fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(UNIT_MODE)
        .open(tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    // The umask may have stripped bits from the create mode.
    std::fs::set_permissions(tmp, Permissions::from_mode(UNIT_MODE))?;
    std::fs::rename(tmp, path)
}

/// Delete `dir/file_name`. Returns `false` if there was nothing to delete.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub fn remove_unit(dir: &Path, file_name: &str) -> Result<bool> {
    let path = dir.join(file_name);
    match std::fs::remove_file(&path) {
        Ok(()) => {
            info!(path = %path.display(), "unit file removed");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "unit file already absent");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printsock_core::types::UnitKind;

    fn unit(contents: &str) -> UnitFile {
        UnitFile {
            kind: UnitKind::Socket,
            file_name: "escpos-printer.socket".into(),
            contents: contents.into(),
        }
    }

    fn mode_of(path: &Path) -> u32 {
        std::fs::metadata(path).expect("stat").permissions().mode() & 0o777
    }

    #[test]
    fn writes_with_unit_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = write_unit(dir.path(), &unit("[Unit]\n")).expect("write");

        let path = dir.path().join("escpos-printer.socket");
        assert_eq!(outcome, WriteOutcome::Written(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "[Unit]\n");
        assert_eq!(mode_of(&path), 0o644);
        assert!(!dir.path().join(".escpos-printer.socket.tmp").exists());
    }

    #[test]
    fn identical_contents_are_left_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_unit(dir.path(), &unit("[Unit]\n")).expect("first");
        let second = write_unit(dir.path(), &unit("[Unit]\n")).expect("second");
        assert!(matches!(second, WriteOutcome::Unchanged(_)));
    }

    #[test]
    fn changed_contents_are_replaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("escpos-printer.socket");
        std::fs::write(&path, "old").expect("seed");
        std::fs::set_permissions(&path, Permissions::from_mode(0o600)).expect("chmod");

        let outcome = write_unit(dir.path(), &unit("new")).expect("write");
        assert!(matches!(outcome, WriteOutcome::Written(_)));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "new");
        assert_eq!(mode_of(&path), 0o644);
    }

    #[test]
    fn missing_directory_is_unit_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        let err = write_unit(&missing, &unit("x")).unwrap_err();
        assert!(matches!(err, PrintsockError::UnitWrite { .. }));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_unit(dir.path(), &unit("x")).expect("write");
        assert!(remove_unit(dir.path(), "escpos-printer.socket").expect("remove"));
        assert!(!remove_unit(dir.path(), "escpos-printer.socket").expect("remove again"));
    }
}
