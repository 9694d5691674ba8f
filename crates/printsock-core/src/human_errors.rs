// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to a plain summary with a concrete next
// step. The binary prints these after the raw error.

use crate::error::PrintsockError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something outside the program may settle by itself; try again.
    Transient,
    /// The operator must do something (plug in the printer, use sudo).
    ActionRequired,
    /// Retrying will not help without changing the input or the system.
    Permanent,
}

/// A human-readable error with a plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `PrintsockError` into a `HumanError`.
pub fn humanize_error(err: &PrintsockError) -> HumanError {
    match err {
        PrintsockError::NotRoot => HumanError {
            message: "Administrator rights are needed.".into(),
            suggestion: "Run the command again with sudo.".into(),
            severity: Severity::ActionRequired,
        },

        PrintsockError::Discovery(_) => HumanError {
            message: "We couldn't search for printers.".into(),
            suggestion: "Check the device pattern in the configuration file.".into(),
            severity: Severity::Permanent,
        },

        PrintsockError::NoPrintersFound { .. } => HumanError {
            message: "No USB printer is connected.".into(),
            suggestion: "Plug the printer in, switch it on, and check that /dev/usb/lp0 appears. The usblp kernel module must be loaded.".into(),
            severity: Severity::ActionRequired,
        },

        PrintsockError::InvalidDevice { .. } => HumanError {
            message: "That doesn't look like a printer device.".into(),
            suggestion: "Run `printsock list` to see the printers that were found, then pass one of them with --device.".into(),
            severity: Severity::ActionRequired,
        },

        PrintsockError::SelectionAborted => HumanError {
            message: "No printer was chosen.".into(),
            suggestion: "Run the command from an interactive terminal, or pass the printer with --device.".into(),
            severity: Severity::ActionRequired,
        },

        PrintsockError::InvalidConfig(_) => HumanError {
            message: "The configuration is not valid.".into(),
            suggestion: "Fix the value mentioned above in the configuration file or on the command line.".into(),
            severity: Severity::Permanent,
        },

        PrintsockError::UnitWrite { source, .. } => {
            if source.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The systemd unit files couldn't be saved.".into(),
                    suggestion: "Run the command again with sudo.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The systemd unit files couldn't be saved.".into(),
                    suggestion: "Check that the unit directory exists and the disk is not full or read-only.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        PrintsockError::CommandSpawn { source, .. } => {
            if source.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "systemctl is not available on this machine.".into(),
                    suggestion: "This tool needs a system running systemd.".into(),
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "A system command couldn't be started.".into(),
                    suggestion: "Try again. If it keeps failing, check the system logs.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        PrintsockError::CommandFailed { output, .. } => humanize_command_output(output),

        PrintsockError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "Check the path given on the command line.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission was denied.".into(),
                    suggestion: "Run the command again with sudo.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        PrintsockError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON.".into(),
            severity: Severity::Permanent,
        },
    }
}

/// Interpret the combined output of a failed systemctl call.
fn humanize_command_output(output: &str) -> HumanError {
    let lower = output.to_ascii_lowercase();

    if lower.contains("address already in use") {
        HumanError {
            message: "Another program is already using the print port.".into(),
            suggestion: "Stop the other print service (e.g. CUPS' raw backend) or choose a different port with --port.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("access denied")
        || lower.contains("interactive authentication required")
    {
        HumanError {
            message: "systemd refused the request.".into(),
            suggestion: "Run the command again with sudo.".into(),
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("bad unit file setting") || lower.contains("invalid argument") {
        HumanError {
            message: "systemd rejected the generated unit files.".into(),
            suggestion: "Check `journalctl -xe` for the offending line.".into(),
            severity: Severity::Permanent,
        }
    } else if lower.contains("system has not been booted with systemd")
        || lower.contains("failed to connect to bus")
    {
        HumanError {
            message: "systemd is not running here.".into(),
            suggestion: "This tool only works on machines booted with systemd (not inside most containers).".into(),
            severity: Severity::Permanent,
        }
    } else {
        HumanError {
            message: "systemctl reported a problem.".into(),
            suggestion: "Read the command output above, then try again.".into(),
            severity: Severity::Transient,
        }
    }
}
