// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command implementations. Everything the user reads goes to `Host::output`
// (stdout in production); diagnostics go through tracing to stderr.

use std::io::{BufRead, Write};

use nix::unistd::Uid;

use printsock_core::config::ProvisionConfig;
use printsock_core::error::Result;
use printsock_core::types::{PrinterDevice, Progress};
use printsock_provision::diagnostics::{generate_summary, run_diagnostics};
use printsock_provision::{
    CommandRunner, Provisioner, SystemRunner, find_printers, privilege, select_printer,
    validate_device,
};

use crate::cli::{Cli, Command, InstallArgs};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// `status` found a failing check.
    Unhealthy,
}

/// The pieces of the host a command talks to.
pub struct Host<R, I, W> {
    pub runner: R,
    pub uid: Uid,
    pub input: I,
    pub output: W,
}

/// Run the parsed command line against the real system.
pub fn run(cli: Cli) -> Result<Outcome> {
    let host = Host {
        runner: SystemRunner,
        uid: Uid::effective(),
        input: std::io::stdin().lock(),
        output: std::io::stdout().lock(),
    };
    dispatch(cli, host)
}

pub fn dispatch<R: CommandRunner, I: BufRead, W: Write>(
    cli: Cli,
    mut host: Host<R, I, W>,
) -> Result<Outcome> {
    let mut config = cli.load_config()?;

    match cli.command {
        None => install(&mut config, &InstallArgs::default(), &mut host),
        Some(Command::Install(ref args)) => install(&mut config, args, &mut host),
        Some(Command::List) => list(&config, &mut host.output),
        Some(Command::Uninstall) => uninstall(config, &mut host),
        Some(Command::Status) => status(config, &mut host),
    }
}

fn install<R: CommandRunner, I: BufRead, W: Write>(
    config: &mut ProvisionConfig,
    args: &InstallArgs,
    host: &mut Host<R, I, W>,
) -> Result<Outcome> {
    args.apply(config);
    let provisioner = Provisioner::new(config.clone(), &host.runner)?;

    if !args.dry_run {
        writeln!(host.output, "Setting up the ESC/POS printer service...")?;
        privilege::check_uid(host.uid)?;
        writeln!(host.output, "✓ Root privileges confirmed.")?;
    }

    let device = choose_device(config, args, &mut host.input, &mut host.output)?;
    writeln!(host.output, "✓ Selected printer: {device}")?;

    if args.dry_run {
        for unit in provisioner.render(&device) {
            let path = config.unit_dir.join(&unit.file_name);
            writeln!(host.output, "\n# {}", path.display())?;
            write!(host.output, "{}", unit.contents)?;
        }
        return Ok(Outcome::Done);
    }

    let output = &mut host.output;
    provisioner.install(&device, |p| report_progress(&mut *output, p))?;

    writeln!(host.output, "\nSetup complete! The printer socket is active and enabled.")?;
    writeln!(
        host.output,
        "This machine now accepts print jobs on TCP port {}.",
        config.port
    )?;
    Ok(Outcome::Done)
}

fn choose_device<I: BufRead, W: Write>(
    config: &ProvisionConfig,
    args: &InstallArgs,
    input: I,
    output: W,
) -> Result<PrinterDevice> {
    if let Some(ref path) = args.device {
        return validate_device(path);
    }

    let printers = find_printers(&config.device_pattern)?;
    let chosen = select_printer(&printers, &config.device_pattern, input, output)?;
    // A discovered path ends up in ExecStart= just like an explicit one.
    validate_device(chosen.path())
}

fn list<W: Write>(config: &ProvisionConfig, output: &mut W) -> Result<Outcome> {
    let printers = find_printers(&config.device_pattern)?;
    if printers.is_empty() {
        writeln!(output, "No USB printers found matching {}.", config.device_pattern)?;
    }
    for printer in &printers {
        writeln!(output, "{printer}")?;
    }
    Ok(Outcome::Done)
}

fn uninstall<R: CommandRunner, I, W: Write>(
    config: ProvisionConfig,
    host: &mut Host<R, I, W>,
) -> Result<Outcome> {
    privilege::check_uid(host.uid)?;
    let provisioner = Provisioner::new(config, &host.runner)?;
    let output = &mut host.output;
    provisioner.uninstall(|p| report_progress(&mut *output, p))?;
    writeln!(host.output, "\nThe printer socket has been removed.")?;
    Ok(Outcome::Done)
}

fn status<R: CommandRunner, I, W: Write>(
    config: ProvisionConfig,
    host: &mut Host<R, I, W>,
) -> Result<Outcome> {
    let provisioner = Provisioner::new(config, &host.runner)?;
    let report = run_diagnostics(provisioner.config(), provisioner.systemctl());
    write!(host.output, "{}", generate_summary(&report))?;
    Ok(if report.passed() {
        Outcome::Done
    } else {
        Outcome::Unhealthy
    })
}

fn report_progress<W: Write>(output: &mut W, progress: Progress) {
    let line = match progress {
        Progress::UnitWritten { kind, path } => {
            format!("✓ {} unit written: {}", kind.label(), path.display())
        }
        Progress::UnitUnchanged { kind, path } => {
            format!("✓ {} unit already up to date: {}", kind.label(), path.display())
        }
        Progress::UnitRemoved { path } => format!("✓ Removed {}", path.display()),
        Progress::CommandStarted { command } => format!("Running: {command}..."),
        Progress::CommandSucceeded { .. } => "✓ Command succeeded.".to_owned(),
    };
    // A closed stdout must not abort provisioning halfway through.
    let _ = writeln!(output, "{line}");
}
