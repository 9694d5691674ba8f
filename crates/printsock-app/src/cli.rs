// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use printsock_core::config::ProvisionConfig;
use printsock_core::error::Result;

/// Expose a USB receipt printer as a raw TCP print service (port 9100)
/// using systemd socket activation.
#[derive(Debug, Parser)]
#[command(name = "printsock", version, about)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick a printer, write the systemd units and start the socket (default).
    Install(InstallArgs),
    /// List the printer devices that were found.
    List,
    /// Stop the socket and remove the unit files.
    Uninstall,
    /// Check that the installed service is healthy.
    Status,
}

#[derive(Debug, Default, Args)]
pub struct InstallArgs {
    /// Printer device to use instead of asking (e.g. /dev/usb/lp0).
    #[arg(long, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// TCP port to listen on.
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to listen on.
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<IpAddr>,

    /// Directory to write the unit files to.
    #[arg(long, value_name = "DIR")]
    pub unit_dir: Option<PathBuf>,

    /// Base name of the generated units.
    #[arg(long)]
    pub name: Option<String>,

    /// Print the units instead of installing them.
    #[arg(long)]
    pub dry_run: bool,
}

impl InstallArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut ProvisionConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(listen) = self.listen {
            config.listen_address = listen;
        }
        if let Some(ref dir) = self.unit_dir {
            config.unit_dir = dir.clone();
        }
        if let Some(ref name) = self.name {
            config.unit_name = name.clone();
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<ProvisionConfig> {
        ProvisionConfig::load_or_default(self.config.as_deref())
    }
}
