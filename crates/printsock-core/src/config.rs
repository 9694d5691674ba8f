// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Provisioning configuration.
//
// Loaded from an optional JSON file; every key may be omitted and falls back
// to the default. Command-line flags override individual fields afterwards.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrintsockError, Result};

/// Default raw TCP port (HP JetDirect).
pub const RAW_PORT: u16 = 9100;

/// Settings that control which units are generated and where they go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Base unit name; produces `<name>.socket` and `<name>@.service`.
    pub unit_name: String,
    /// Description prefix; " Socket" / " Service" is appended per unit.
    pub description: String,
    /// Address the socket unit listens on.
    pub listen_address: IpAddr,
    /// TCP port the socket unit listens on.
    pub port: u16,
    /// Directory the unit files are written to.
    pub unit_dir: PathBuf,
    /// Glob pattern used to discover printer devices.
    pub device_pattern: String,
    /// `systemctl` executable (looked up in `PATH` when relative).
    pub systemctl: PathBuf,
    /// `tee` executable used by the service unit. Must be absolute.
    pub tee: PathBuf,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            unit_name: "escpos-printer".into(),
            description: "ESC/POS Printer".into(),
            listen_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: RAW_PORT,
            unit_dir: PathBuf::from("/etc/systemd/system"),
            device_pattern: "/dev/usb/lp*".into(),
            systemctl: PathBuf::from("systemctl"),
            tee: PathBuf::from("/usr/bin/tee"),
        }
    }
}

impl ProvisionConfig {
    /// Read a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Read `path` if given, otherwise return the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings that would produce broken unit files.
    pub fn validate(&self) -> Result<()> {
        if self.unit_name.is_empty() {
            return Err(PrintsockError::InvalidConfig("unit name is empty".into()));
        }
        if let Some(bad) = self
            .unit_name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
        {
            return Err(PrintsockError::InvalidConfig(format!(
                "unit name '{}' contains invalid character '{bad}'",
                self.unit_name
            )));
        }
        if self.port == 0 {
            return Err(PrintsockError::InvalidConfig("port must not be 0".into()));
        }
        if !self.unit_dir.is_absolute() {
            return Err(PrintsockError::InvalidConfig(format!(
                "unit directory {} is not absolute",
                self.unit_dir.display()
            )));
        }
        if !self.tee.is_absolute() {
            return Err(PrintsockError::InvalidConfig(format!(
                "tee path {} is not absolute",
                self.tee.display()
            )));
        }
        if self.description.contains('\n') {
            return Err(PrintsockError::InvalidConfig(
                "description must be a single line".into(),
            ));
        }
        Ok(())
    }

    /// Socket unit file name, e.g. `escpos-printer.socket`.
    pub fn socket_unit(&self) -> String {
        format!("{}.socket", self.unit_name)
    }

    /// Template service unit file name, e.g. `escpos-printer@.service`.
    pub fn service_unit(&self) -> String {
        format!("{}@.service", self.unit_name)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address, self.port)
    }

    pub fn socket_unit_path(&self) -> PathBuf {
        self.unit_dir.join(self.socket_unit())
    }

    pub fn service_unit_path(&self) -> PathBuf {
        self.unit_dir.join(self.service_unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_escpos_layout() {
        let config = ProvisionConfig::default();
        assert_eq!(config.socket_unit(), "escpos-printer.socket");
        assert_eq!(config.service_unit(), "escpos-printer@.service");
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:9100");
        assert_eq!(
            config.socket_unit_path(),
            PathBuf::from("/etc/systemd/system/escpos-printer.socket")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{ "port": 9101, "unit_name": "kitchen-printer" }}"#).expect("write");

        let config = ProvisionConfig::load(file.path()).expect("load");
        assert_eq!(config.port, 9101);
        assert_eq!(config.unit_name, "kitchen-printer");
        assert_eq!(config.device_pattern, "/dev/usb/lp*");
    }

    #[test]
    fn malformed_file_is_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{{ port: ").expect("write");

        let err = ProvisionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, PrintsockError::Serialization(_)));
    }

    #[test]
    fn no_path_gives_defaults() {
        let config = ProvisionConfig::load_or_default(None).expect("default");
        assert_eq!(config, ProvisionConfig::default());
    }

    #[test]
    fn template_marker_in_name_is_rejected() {
        let config = ProvisionConfig {
            unit_name: "printer@".into(),
            ..ProvisionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PrintsockError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_port_and_relative_dir_are_rejected() {
        let zero = ProvisionConfig {
            port: 0,
            ..ProvisionConfig::default()
        };
        assert!(zero.validate().is_err());

        let relative = ProvisionConfig {
            unit_dir: PathBuf::from("units"),
            ..ProvisionConfig::default()
        };
        assert!(relative.validate().is_err());
    }
}
