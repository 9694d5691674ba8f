// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// USB printer discovery.
//
// The usblp kernel driver exposes each attached printer as a character device
// under /dev/usb/lpN.  We glob for those nodes and keep only entries that
// really are character devices, so stale regular files left behind by a
// careless `cat > /dev/usb/lp0` on an unplugged printer are ignored.

use std::os::unix::fs::FileTypeExt;
use std::path::Path;

use tracing::{debug, info, instrument};

use printsock_core::error::{PrintsockError, Result};
use printsock_core::types::PrinterDevice;

/// Find printer devices matching `pattern` (e.g. `/dev/usb/lp*`).
///
/// Entries whose metadata cannot be read are skipped.  The result is sorted
/// by path so that the numbering shown to the user is stable.
#[instrument]
pub fn find_printers(pattern: &str) -> Result<Vec<PrinterDevice>> {
    let entries = glob::glob(pattern)
        .map_err(|e| PrintsockError::Discovery(format!("bad pattern {pattern}: {e}")))?;

    let mut printers = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "skipping unreadable glob entry");
                continue;
            }
        };
        match std::fs::metadata(&path) {
            Ok(meta) if meta.file_type().is_char_device() => {
                printers.push(PrinterDevice::new(path));
            }
            Ok(_) => debug!(path = %path.display(), "not a character device, skipping"),
            Err(e) => debug!(path = %path.display(), error = %e, "cannot stat, skipping"),
        }
    }

    printers.sort();
    info!(count = printers.len(), "printer discovery finished");
    Ok(printers)
}

/// Check a device path given explicitly on the command line.
pub fn validate_device(path: &Path) -> Result<PrinterDevice> {
    let invalid = |reason: &str| PrintsockError::InvalidDevice {
        path: path.to_path_buf(),
        reason: reason.into(),
    };

    if !path.is_absolute() {
        return Err(invalid("path must be absolute"));
    }
    // ExecStart= splits arguments on whitespace.
    if path.to_string_lossy().chars().any(char::is_whitespace) {
        return Err(invalid("path must not contain whitespace"));
    }
    let meta = std::fs::metadata(path).map_err(|e| invalid(&e.to_string()))?;
    if !meta.file_type().is_char_device() {
        return Err(invalid("not a character device"));
    }

    Ok(PrinterDevice::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_files_are_filtered_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("lp0"), b"").expect("write");
        std::fs::write(dir.path().join("lp1"), b"").expect("write");

        let pattern = format!("{}/lp*", dir.path().display());
        let found = find_printers(&pattern).expect("glob");
        assert!(found.is_empty());
    }

    #[test]
    fn character_devices_are_kept() {
        // /dev/null and /dev/zero are character devices on every Linux box.
        let found = find_printers("/dev/[nz][ue][lr][lo]").expect("glob");
        let paths: Vec<_> = found.iter().map(|p| p.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                std::path::PathBuf::from("/dev/null"),
                std::path::PathBuf::from("/dev/zero"),
            ]
        );
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pattern = format!("{}/lp*", dir.path().display());
        assert!(find_printers(&pattern).expect("glob").is_empty());
    }

    #[test]
    fn malformed_pattern_is_discovery_error() {
        assert!(matches!(
            find_printers("/dev/usb/lp[").unwrap_err(),
            PrintsockError::Discovery(_)
        ));
    }

    #[test]
    fn validate_accepts_char_device() {
        let dev = validate_device(Path::new("/dev/null")).expect("valid");
        assert_eq!(dev.to_string(), "/dev/null");
    }

    #[test]
    fn validate_rejects_regular_file_and_relative_path() {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        assert!(matches!(
            validate_device(file.path()),
            Err(PrintsockError::InvalidDevice { .. })
        ));
        assert!(validate_device(Path::new("usb/lp0")).is_err());
        assert!(validate_device(Path::new("/dev/usb/does not exist")).is_err());
    }
}
