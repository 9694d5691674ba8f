// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// systemctl driver.
//
// Commands are executed through the `CommandRunner` trait so that the
// activation sequence can be exercised without a running systemd.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument, warn};

use printsock_core::error::{PrintsockError, Result};

/// Captured result of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Human-readable exit status (e.g. "exit status: 1").
    pub status: String,
    /// stdout followed by stderr.
    pub output: String,
}

/// Something that can run an external program to completion.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput> {
        let out = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| PrintsockError::CommandSpawn {
                command: command_line(program, args),
                source,
            })?;

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        Ok(CommandOutput {
            success: out.status.success(),
            status: out.status.to_string(),
            output,
        })
    }
}

/// Join a program and its arguments for display.
pub fn command_line(program: &Path, args: &[&str]) -> String {
    std::iter::once(program.to_string_lossy().into_owned())
        .chain(args.iter().map(|a| (*a).to_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Thin typed wrapper over the `systemctl` verbs we need.
pub struct Systemctl<R: CommandRunner> {
    program: PathBuf,
    runner: R,
}

impl<R: CommandRunner> Systemctl<R> {
    pub fn new(program: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// The command line `args` would run, for progress output.
    pub fn describe(&self, args: &[&str]) -> String {
        command_line(&self.program, args)
    }

    /// Run `systemctl <args>`, failing with the combined output on a
    /// non-zero exit.
    #[instrument(skip(self))]
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let out = self.runner.run(&self.program, args)?;
        if out.success {
            debug!("systemctl succeeded");
            Ok(out.output)
        } else {
            warn!(status = %out.status, "systemctl failed");
            Err(PrintsockError::CommandFailed {
                command: self.describe(args),
                status: out.status,
                output: out.output.trim_end().to_owned(),
            })
        }
    }

    pub fn daemon_reload(&self) -> Result<()> {
        self.run(&["daemon-reload"]).map(drop)
    }

    pub fn enable_now(&self, unit: &str) -> Result<()> {
        self.run(&["enable", "--now", unit]).map(drop)
    }

    pub fn restart(&self, unit: &str) -> Result<()> {
        self.run(&["restart", unit]).map(drop)
    }

    pub fn disable_now(&self, unit: &str) -> Result<()> {
        self.run(&["disable", "--now", unit]).map(drop)
    }

    /// `systemctl is-active --quiet <unit>`; a non-zero exit means inactive.
    pub fn is_active(&self, unit: &str) -> Result<bool> {
        let out = self
            .runner
            .run(&self.program, &["is-active", "--quiet", unit])?;
        Ok(out.success)
    }
}
