// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// systemd unit rendering.
//
// Two units expose the printer on the network:
//
//   <name>.socket     listens on 0.0.0.0:9100 with Accept=yes, so systemd
//                     spawns one service instance per TCP connection;
//   <name>@.service   the per-connection template: its stdin is the
//                     accepted socket, and `tee` copies every byte into the
//                     printer device (and /dev/null, which gives the
//                     printer a moment to register the job).

use std::path::PathBuf;

use printsock_core::config::ProvisionConfig;
use printsock_core::types::{PrinterDevice, UnitFile, UnitKind};

/// Render the listening socket unit.
pub fn render_socket_unit(config: &ProvisionConfig) -> UnitFile {
    let contents = format!(
        "[Unit]
Description={description} Socket

[Socket]
ListenStream={listen}
Accept=yes

[Install]
WantedBy=sockets.target
",
        description = escape_specifiers(&config.description),
        listen = config.listen_addr(),
    );

    UnitFile {
        kind: UnitKind::Socket,
        file_name: config.socket_unit(),
        contents,
    }
}

/// Render the per-connection template service for `device`.
///
/// The leading `-` on ExecStart makes a failed write (printer unplugged
/// mid-job) a non-fatal exit so the socket unit is not put into a failed
/// state.
pub fn render_service_unit(config: &ProvisionConfig, device: &PrinterDevice) -> UnitFile {
    let contents = format!(
        "[Unit]
Description={description} Service

[Service]
ExecStart=-{tee} /dev/null {device}
StandardInput=socket
StandardOutput=null
",
        description = escape_specifiers(&config.description),
        tee = escape_specifiers(&config.tee.to_string_lossy()),
        device = escape_specifiers(&device.path().to_string_lossy()),
    );

    UnitFile {
        kind: UnitKind::Service,
        file_name: config.service_unit(),
        contents,
    }
}

/// Recover the printer device from an installed service unit.
///
/// Expects the layout written by `render_service_unit`:
/// `ExecStart=-<tee> /dev/null <device>`.
pub fn device_from_service_unit(contents: &str) -> Option<PathBuf> {
    let exec = contents
        .lines()
        .find_map(|line| line.trim().strip_prefix("ExecStart="))?;
    let args: Vec<&str> = exec.trim_start_matches('-').split_whitespace().collect();
    match args.as_slice() {
        [_tee, "/dev/null", device] if device.starts_with('/') => {
            Some(PathBuf::from(device.replace("%%", "%")))
        }
        _ => None,
    }
}

/// `%` starts a specifier in unit files; a literal one is written `%%`.
fn escape_specifiers(value: &str) -> String {
    value.replace('%', "%%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_unit_listens_on_all_interfaces() {
        let unit = render_socket_unit(&ProvisionConfig::default());
        assert_eq!(unit.kind, UnitKind::Socket);
        assert_eq!(unit.file_name, "escpos-printer.socket");
        assert_eq!(
            unit.contents,
            "[Unit]\n\
             Description=ESC/POS Printer Socket\n\
             \n\
             [Socket]\n\
             ListenStream=0.0.0.0:9100\n\
             Accept=yes\n\
             \n\
             [Install]\n\
             WantedBy=sockets.target\n"
        );
    }

    #[test]
    fn service_unit_targets_device() {
        let device = PrinterDevice::new("/dev/usb/lp0");
        let unit = render_service_unit(&ProvisionConfig::default(), &device);
        assert_eq!(unit.kind, UnitKind::Service);
        assert_eq!(unit.file_name, "escpos-printer@.service");
        assert_eq!(
            unit.contents,
            "[Unit]\n\
             Description=ESC/POS Printer Service\n\
             \n\
             [Service]\n\
             ExecStart=-/usr/bin/tee /dev/null /dev/usb/lp0\n\
             StandardInput=socket\n\
             StandardOutput=null\n"
        );
    }

    #[test]
    fn custom_port_and_name() {
        let config = ProvisionConfig {
            unit_name: "kitchen".into(),
            port: 9101,
            listen_address: "192.168.1.20".parse().expect("ip"),
            ..ProvisionConfig::default()
        };
        let socket = render_socket_unit(&config);
        assert_eq!(socket.file_name, "kitchen.socket");
        assert!(socket.contents.contains("ListenStream=192.168.1.20:9101\n"));
        assert_eq!(
            render_service_unit(&config, &PrinterDevice::new("/dev/usb/lp0")).file_name,
            "kitchen@.service"
        );
    }

    #[test]
    fn percent_in_device_is_escaped() {
        let unit = render_service_unit(
            &ProvisionConfig::default(),
            &PrinterDevice::new("/dev/printers/50%"),
        );
        assert!(unit.contents.contains("/dev/null /dev/printers/50%%\n"));
        assert_eq!(
            device_from_service_unit(&unit.contents),
            Some(PathBuf::from("/dev/printers/50%"))
        );
    }

    #[test]
    fn device_recovered_from_rendered_unit() {
        let unit = render_service_unit(
            &ProvisionConfig::default(),
            &PrinterDevice::new("/dev/usb/lp3"),
        );
        assert_eq!(
            device_from_service_unit(&unit.contents),
            Some(PathBuf::from("/dev/usb/lp3"))
        );
    }

    #[test]
    fn dev_null_as_device_is_recovered() {
        let unit = render_service_unit(
            &ProvisionConfig::default(),
            &PrinterDevice::new("/dev/null"),
        );
        assert_eq!(
            device_from_service_unit(&unit.contents),
            Some(PathBuf::from("/dev/null"))
        );
    }

    #[test]
    fn percent_in_description_is_escaped() {
        let config = ProvisionConfig {
            description: "Bar 100% Printer".into(),
            ..ProvisionConfig::default()
        };
        let socket = render_socket_unit(&config);
        assert!(socket.contents.contains("Description=Bar 100%% Printer Socket\n"));
        let service = render_service_unit(&config, &PrinterDevice::new("/dev/usb/lp0"));
        assert!(service.contents.contains("Description=Bar 100%% Printer Service\n"));
    }

    #[test]
    fn device_not_found_in_foreign_unit() {
        assert_eq!(device_from_service_unit("[Service]\nType=simple\n"), None);
        assert_eq!(
            device_from_service_unit("[Service]\nExecStart=/usr/bin/tee /dev/null\n"),
            None
        );
        assert_eq!(
            device_from_service_unit("[Service]\nExecStart=/usr/bin/cat /dev/usb/lp0\n"),
            None
        );
    }
}
