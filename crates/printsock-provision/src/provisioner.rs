// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Install / uninstall orchestration.
//
// Install is strictly sequential and stops at the first failure:
//   write socket unit → write service unit → daemon-reload
//   → enable --now <socket> → restart <socket>
// The restart makes a re-run pick up a changed port or device even when the
// socket was already enabled.

use tracing::{info, instrument, warn};

use printsock_core::config::ProvisionConfig;
use printsock_core::error::Result;
use printsock_core::types::{PrinterDevice, Progress, UnitFile};

use crate::install::{self, WriteOutcome};
use crate::systemctl::{CommandRunner, Systemctl};
use crate::units;

pub struct Provisioner<R: CommandRunner> {
    config: ProvisionConfig,
    systemctl: Systemctl<R>,
}

impl<R: CommandRunner> Provisioner<R> {
    /// Build a provisioner; the configuration is validated up front.
    pub fn new(config: ProvisionConfig, runner: R) -> Result<Self> {
        config.validate()?;
        let systemctl = Systemctl::new(config.systemctl.clone(), runner);
        Ok(Self { config, systemctl })
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    pub fn systemctl(&self) -> &Systemctl<R> {
        &self.systemctl
    }

    /// Render the socket and service units without touching the system.
    pub fn render(&self, device: &PrinterDevice) -> [UnitFile; 2] {
        [
            units::render_socket_unit(&self.config),
            units::render_service_unit(&self.config, device),
        ]
    }

    /// Write both units and activate the socket.
    #[instrument(skip_all, fields(device = %device))]
    pub fn install(
        &self,
        device: &PrinterDevice,
        mut progress: impl FnMut(Progress),
    ) -> Result<()> {
        for unit in self.render(device) {
            let event = match install::write_unit(&self.config.unit_dir, &unit)? {
                WriteOutcome::Written(path) => Progress::UnitWritten {
                    kind: unit.kind,
                    path,
                },
                WriteOutcome::Unchanged(path) => Progress::UnitUnchanged {
                    kind: unit.kind,
                    path,
                },
            };
            progress(event);
        }

        let socket = self.config.socket_unit();
        let steps: [&[&str]; 3] = [
            &["daemon-reload"],
            &["enable", "--now", socket.as_str()],
            &["restart", socket.as_str()],
        ];
        for args in steps {
            let command = self.systemctl.describe(args);
            progress(Progress::CommandStarted {
                command: command.clone(),
            });
            self.systemctl.run(args)?;
            progress(Progress::CommandSucceeded { command });
        }

        info!(listen = %self.config.listen_addr(), "printer socket active");
        Ok(())
    }

    /// Stop and disable the socket, delete both units and reload systemd.
    ///
    /// A failing `disable` is tolerated: the units may never have been
    /// loaded, and the files should still be cleaned up.
    #[instrument(skip(self, progress))]
    pub fn uninstall(&self, mut progress: impl FnMut(Progress)) -> Result<()> {
        let socket = self.config.socket_unit();
        let disable: &[&str] = &["disable", "--now", socket.as_str()];
        let command = self.systemctl.describe(disable);
        progress(Progress::CommandStarted {
            command: command.clone(),
        });
        match self.systemctl.run(disable) {
            Ok(_) => progress(Progress::CommandSucceeded { command }),
            Err(e) => warn!(error = %e, "could not disable socket, continuing"),
        }

        for file_name in [self.config.socket_unit(), self.config.service_unit()] {
            if install::remove_unit(&self.config.unit_dir, &file_name)? {
                progress(Progress::UnitRemoved {
                    path: self.config.unit_dir.join(&file_name),
                });
            }
        }

        let reload: &[&str] = &["daemon-reload"];
        let command = self.systemctl.describe(reload);
        progress(Progress::CommandStarted {
            command: command.clone(),
        });
        self.systemctl.run(reload)?;
        progress(Progress::CommandSucceeded { command });

        info!("printer socket removed");
        Ok(())
    }
}
