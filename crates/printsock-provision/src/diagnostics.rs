// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Installation health checks.
//
// Runs a sequence of checks: unit files → printer device → socket active →
// port listening. Stops at the first failure and says what to do about it.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::os::unix::fs::FileTypeExt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use printsock_core::config::ProvisionConfig;

use crate::systemctl::{CommandRunner, Systemctl};
use crate::units;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of a single diagnostic step.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
    /// What to do if the step failed.
    pub fix: Option<String>,
}

impl StepResult {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail,
            fix: None,
        }
    }

    fn fail(name: &str, detail: String, fix: &str) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail,
            fix: Some(fix.into()),
        }
    }
}

/// Full diagnostic report.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub steps: Vec<StepResult>,
    /// Index into `steps` of the failed step, if any.
    pub failed_step: Option<usize>,
    pub summary: String,
    /// Device named by the installed service unit, if it could be read.
    pub device: Option<PathBuf>,
}

impl DiagnosticReport {
    pub fn passed(&self) -> bool {
        self.failed_step.is_none()
    }

    fn push(&mut self, step: StepResult) -> bool {
        let passed = step.passed;
        if !passed {
            self.failed_step = Some(self.steps.len());
            self.summary = step.detail.clone();
        }
        self.steps.push(step);
        passed
    }
}

/// Run all checks against the installation described by `config`.
pub fn run_diagnostics<R: CommandRunner>(
    config: &ProvisionConfig,
    systemctl: &Systemctl<R>,
) -> DiagnosticReport {
    let mut report = DiagnosticReport {
        steps: Vec::new(),
        failed_step: None,
        summary: String::new(),
        device: None,
    };

    // Step 1: Unit Files
    let (step, service_text) = check_unit_files(config);
    if !report.push(step) {
        return report;
    }

    // Step 2: Printer Device
    report.device = service_text.as_deref().and_then(units::device_from_service_unit);
    if !report.push(check_device(report.device.clone())) {
        return report;
    }

    // Step 3: Socket Active
    if !report.push(check_socket_active(config, systemctl)) {
        return report;
    }

    // Step 4: Port Listening
    if !report.push(check_listening(config)) {
        return report;
    }

    report.summary = format!(
        "Everything looks good. The printer accepts jobs on TCP port {}.",
        config.port
    );
    report
}

/// Render the report as plain text, e.g. for pasting into a support ticket.
pub fn generate_summary(report: &DiagnosticReport) -> String {
    let now = chrono::Utc::now().format("%d %b %Y, %H:%M UTC");
    let mut text = format!("printsock status report\nDate: {now}\n");
    if let Some(ref device) = report.device {
        text.push_str(&format!("Printer: {}\n", device.display()));
    }
    text.push('\n');

    for (i, step) in report.steps.iter().enumerate() {
        let mark = if step.passed { "ok" } else { "FAILED" };
        text.push_str(&format!("{}. {} [{mark}]: {}\n", i + 1, step.name, step.detail));
        if let Some(ref fix) = step.fix {
            text.push_str(&format!("   What to do: {fix}\n"));
        }
    }

    text.push('\n');
    text.push_str(&report.summary);
    text.push('\n');
    text
}

// -- Step implementations ---------------------------------------------------

fn check_unit_files(config: &ProvisionConfig) -> (StepResult, Option<String>) {
    const NAME: &str = "Unit Files";
    let socket = config.socket_unit_path();
    let service = config.service_unit_path();

    if !socket.exists() {
        return (
            StepResult::fail(
                NAME,
                format!("{} is missing.", socket.display()),
                "Run `sudo printsock install` to create it.",
            ),
            None,
        );
    }
    match std::fs::read_to_string(&service) {
        Ok(text) => {
            let detail = format!("Both unit files are in {}.", config.unit_dir.display());
            (StepResult::pass(NAME, detail), Some(text))
        }
        Err(e) => {
            debug!(error = %e, "cannot read service unit");
            (
                StepResult::fail(
                    NAME,
                    format!("{} is missing or unreadable.", service.display()),
                    "Run `sudo printsock install` to create it.",
                ),
                None,
            )
        }
    }
}

fn check_device(device: Option<PathBuf>) -> StepResult {
    const NAME: &str = "Printer Device";
    let Some(device) = device else {
        return StepResult::fail(
            NAME,
            "The service unit does not name a printer device.".into(),
            "Run `sudo printsock install` again to regenerate it.",
        );
    };

    match std::fs::metadata(&device) {
        Ok(meta) if meta.file_type().is_char_device() => {
            StepResult::pass(NAME, format!("{} is connected.", device.display()))
        }
        Ok(_) => StepResult::fail(
            NAME,
            format!("{} exists but is not a printer device.", device.display()),
            "Remove the stray file and reconnect the printer.",
        ),
        Err(_) => StepResult::fail(
            NAME,
            format!("{} is not present.", device.display()),
            "Check that the printer is plugged in and switched on. If it now shows up under a different number, run `sudo printsock install` again.",
        ),
    }
}

fn check_socket_active<R: CommandRunner>(
    config: &ProvisionConfig,
    systemctl: &Systemctl<R>,
) -> StepResult {
    const NAME: &str = "Socket Active";
    let unit = config.socket_unit();
    match systemctl.is_active(&unit) {
        Ok(true) => StepResult::pass(NAME, format!("{unit} is active.")),
        Ok(false) => StepResult::fail(
            NAME,
            format!("{unit} is not active."),
            "Run `sudo systemctl enable --now` on the socket, or check `journalctl -u` for errors.",
        ),
        Err(e) => StepResult::fail(
            NAME,
            format!("Could not query systemd: {e}"),
            "Check that this machine runs systemd.",
        ),
    }
}

fn check_listening(config: &ProvisionConfig) -> StepResult {
    const NAME: &str = "Port Listening";
    let addr = probe_addr(config);
    match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
        Ok(_) => StepResult::pass(NAME, format!("Something is listening on {addr}.")),
        Err(e) => StepResult::fail(
            NAME,
            format!("Nothing answered on {addr} ({e})."),
            "Restart the socket unit, and make sure no firewall rule blocks the port.",
        ),
    }
}

/// Where to connect to reach the socket from this machine.
fn probe_addr(config: &ProvisionConfig) -> SocketAddr {
    let ip = match config.listen_address {
        IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        other => other,
    };
    SocketAddr::new(ip, config.port)
}
