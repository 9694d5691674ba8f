// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printsock Provision — USB printer discovery, systemd unit rendering and
// activation.  This crate bridges between the core domain types defined in
// `printsock-core` and the host's device nodes, unit directory and systemctl.

pub mod diagnostics;
pub mod discovery;
pub mod install;
pub mod privilege;
pub mod provisioner;
pub mod selection;
pub mod systemctl;
pub mod units;

pub use discovery::{find_printers, validate_device};
pub use provisioner::Provisioner;
pub use selection::select_printer;
pub use systemctl::{CommandRunner, Systemctl, SystemRunner};
