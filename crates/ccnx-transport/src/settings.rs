//! Transport settings loaded from `~/.ccnx/transport.toml` and the environment.
//!
//! The file is optional. Missing or malformed files fall back to defaults with
//! a warning. After the file is read, two environment variables override it:
//!
//! - `METIS_PORT`: the Metis forwarder port
//! - `CCNX_FORWARDER`: which forwarder connector to use (`metis` or `local`)

use crate::components::{
    ApiConnector, LocalForwarder, MetisForwarder, ProtocolStack, TlvCodec, VegasFlowController,
    METIS_DEFAULT_PORT,
};
use crate::transport_config::TransportConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Environment variable overriding the Metis port.
pub const METIS_PORT_ENV: &str = "METIS_PORT";

/// Environment variable selecting the forwarder connector.
pub const FORWARDER_CONNECTION_ENV: &str = "CCNX_FORWARDER";

/// Default socket path of the local forwarder.
pub const DEFAULT_LOCAL_PATH: &str = "/tmp/ccnx_local_forwarder";

/// Which forwarder connector sits at the bottom of the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwarderKind {
    /// A Metis forwarder reached over TCP.
    #[default]
    Metis,
    /// A local forwarder reached over a unix socket.
    Local,
}

impl FromStr for ForwarderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metis" => Ok(Self::Metis),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown forwarder '{other}', expected metis or local")),
        }
    }
}

impl fmt::Display for ForwarderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metis => f.write_str("metis"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Settings describing the standard protocol stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Forwarder connector.
    pub forwarder: ForwarderKind,
    /// Metis port, used when `forwarder` is `metis`.
    pub metis_port: u16,
    /// Socket path, used when `forwarder` is `local`.
    pub local_path: String,
    /// Whether the Vegas flow controller is part of the stack.
    pub flow_control: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            forwarder: ForwarderKind::Metis,
            metis_port: METIS_DEFAULT_PORT,
            local_path: DEFAULT_LOCAL_PATH.to_string(),
            flow_control: true,
        }
    }
}

impl TransportSettings {
    /// Applies `METIS_PORT` and `CCNX_FORWARDER` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(METIS_PORT_ENV) {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.metis_port = port,
                Err(e) => warn!(var = METIS_PORT_ENV, value = %raw, error = %e, "Ignoring invalid port"),
            }
        }
        if let Some(raw) = lookup(FORWARDER_CONNECTION_ENV) {
            match raw.parse::<ForwarderKind>() {
                Ok(kind) => self.forwarder = kind,
                Err(e) => warn!(var = FORWARDER_CONNECTION_ENV, error = %e, "Ignoring invalid forwarder"),
            }
        }
    }

    /// The standard stack these settings describe.
    pub fn protocol_stack(&self) -> ProtocolStack {
        let mut stack = ProtocolStack::new().with(ApiConnector);
        if self.flow_control {
            stack = stack.with(VegasFlowController);
        }
        stack = stack.with(TlvCodec);
        match self.forwarder {
            ForwarderKind::Metis => stack.with(MetisForwarder::with_port(self.metis_port)),
            ForwarderKind::Local => stack.with(LocalForwarder::new(self.local_path.clone())),
        }
    }

    /// Composes the full transport configuration.
    pub fn build_transport_config(&self) -> TransportConfig {
        self.protocol_stack().transport_config()
    }
}

/// Loads settings from a TOML file, with defaults, then applies the environment.
pub fn load_settings(path: Option<&Path>) -> TransportSettings {
    let mut settings = read_settings_file(path);
    settings.apply_env();
    settings
}

/// Loads settings from a TOML file without consulting the environment.
pub fn read_settings_file(path: Option<&Path>) -> TransportSettings {
    let settings_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_settings_path);

    if !settings_path.exists() {
        info!(path = %settings_path.display(), "Settings file not found, using defaults");
        return TransportSettings::default();
    }

    match std::fs::read_to_string(&settings_path) {
        Ok(contents) => match toml::from_str::<TransportSettings>(&contents) {
            Ok(settings) => {
                info!(path = %settings_path.display(), "Loaded transport settings");
                settings
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %settings_path.display(),
                    "Failed to parse settings, using defaults"
                );
                TransportSettings::default()
            }
        },
        Err(e) => {
            warn!(
                error = %e,
                path = %settings_path.display(),
                "Failed to read settings file, using defaults"
            );
            TransportSettings::default()
        }
    }
}

/// Get the default settings file path.
pub fn default_settings_path() -> PathBuf {
    ccnx_home().join("transport.toml")
}

/// Get the default CCNx home directory.
pub fn ccnx_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".ccnx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{metis_port_from_config, read_components};
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = read_settings_file(Some(Path::new("/nonexistent/transport.toml")));
        assert_eq!(settings, TransportSettings::default());
        assert_eq!(settings.metis_port, 9695);
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transport.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "forwarder = \"local\"").unwrap();
        writeln!(f, "local_path = \"/run/fwd.sock\"").unwrap();
        writeln!(f, "flow_control = false").unwrap();
        drop(f);

        let settings = read_settings_file(Some(&path));
        assert_eq!(settings.forwarder, ForwarderKind::Local);
        assert_eq!(settings.local_path, "/run/fwd.sock");
        assert!(!settings.flow_control);
        assert_eq!(settings.metis_port, 9695);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transport.toml");
        std::fs::write(&path, "metis_port = \"not a number\"").unwrap();
        assert_eq!(read_settings_file(Some(&path)), TransportSettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = TransportSettings::default();
        settings.apply_overrides(lookup_from(&[
            ("METIS_PORT", "10001"),
            ("CCNX_FORWARDER", "LOCAL"),
        ]));
        assert_eq!(settings.metis_port, 10001);
        assert_eq!(settings.forwarder, ForwarderKind::Local);
    }

    #[test]
    fn test_invalid_env_ignored() {
        let mut settings = TransportSettings::default();
        settings.apply_overrides(lookup_from(&[
            ("METIS_PORT", "99999"),
            ("CCNX_FORWARDER", "carrier-pigeon"),
        ]));
        assert_eq!(settings, TransportSettings::default());
    }

    #[test]
    fn test_build_metis_stack() {
        let settings = TransportSettings {
            metis_port: 9001,
            ..TransportSettings::default()
        };
        let config = settings.build_transport_config();
        assert_eq!(
            read_components(config.stack_config()).unwrap(),
            vec!["API_CONNECTOR", "FC_VEGAS", "CODEC_TLV", "FWD_METIS"]
        );
        assert_eq!(metis_port_from_config(config.connection_config()), 9001);
    }

    #[test]
    fn test_build_local_stack_without_flow_control() {
        let settings = TransportSettings {
            forwarder: ForwarderKind::Local,
            flow_control: false,
            ..TransportSettings::default()
        };
        let config = settings.build_transport_config();
        assert_eq!(
            read_components(config.stack_config()).unwrap(),
            vec!["API_CONNECTOR", "CODEC_TLV", "FWD_LOCAL"]
        );
        assert!(!config.connection_config().contains("FWD_METIS"));
        assert_eq!(
            config.connection_config().get("FWD_LOCAL").unwrap()["path"],
            DEFAULT_LOCAL_PATH
        );
    }
}
