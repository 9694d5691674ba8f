// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Root check. Writing into /etc/systemd/system and driving systemctl both
// need an effective uid of 0.

use nix::unistd::Uid;
use tracing::debug;

use printsock_core::error::{PrintsockError, Result};

/// Fail with `NotRoot` unless the process runs with effective uid 0.
pub fn ensure_root() -> Result<()> {
    check_uid(Uid::effective())
}

pub fn check_uid(uid: Uid) -> Result<()> {
    if uid.is_root() {
        debug!("running as root");
        Ok(())
    } else {
        Err(PrintsockError::NotRoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_passes() {
        assert!(check_uid(Uid::from_raw(0)).is_ok());
    }

    #[test]
    fn regular_user_is_rejected() {
        assert!(matches!(
            check_uid(Uid::from_raw(1000)),
            Err(PrintsockError::NotRoot)
        ));
    }
}
