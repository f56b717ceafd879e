use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PYTHON_BIN: &str = "python3";
pub const DEFAULT_SMUGGLER_PATH: &str = "/opt/smuggler/smuggler.py";
pub const DEFAULT_MAX_DURATION_SECS: u64 = 300;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// On-disk configuration file. Every field is optional so a file only needs
/// to name what it overrides.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SmugglerConfig {
    pub scanner: Option<ScannerSection>,
    pub server: Option<ServerSection>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScannerSection {
    pub python_bin: Option<PathBuf>,
    pub smuggler_path: Option<PathBuf>,
    /// Seconds before a running scan is killed. `0` disables the deadline.
    pub max_duration_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Resolved scanner settings, built once at startup and shared by reference
/// with every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    pub python_bin: PathBuf,
    pub smuggler_path: PathBuf,
    pub max_duration: Option<Duration>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            python_bin: PathBuf::from(DEFAULT_PYTHON_BIN),
            smuggler_path: PathBuf::from(DEFAULT_SMUGGLER_PATH),
            max_duration: Some(Duration::from_secs(DEFAULT_MAX_DURATION_SECS)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Values supplied on the command line or through the environment. These
/// take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ScannerOverrides {
    pub python_bin: Option<PathBuf>,
    pub smuggler_path: Option<PathBuf>,
    pub max_duration_secs: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl SmugglerConfig {
    /// Layer the file's scanner section and the overrides on top of the defaults.
    pub fn scanner_config(&self, overrides: &ScannerOverrides) -> ScannerConfig {
        let defaults = ScannerConfig::default();
        let section = self.scanner.clone().unwrap_or_default();

        let max_duration_secs = overrides
            .max_duration_secs
            .or(section.max_duration_secs)
            .unwrap_or(DEFAULT_MAX_DURATION_SECS);

        ScannerConfig {
            python_bin: overrides
                .python_bin
                .clone()
                .or(section.python_bin)
                .unwrap_or(defaults.python_bin),
            smuggler_path: overrides
                .smuggler_path
                .clone()
                .or(section.smuggler_path)
                .unwrap_or(defaults.smuggler_path),
            max_duration: (max_duration_secs > 0).then(|| Duration::from_secs(max_duration_secs)),
        }
    }

    pub fn server_config(&self, overrides: &ServerOverrides) -> ServerConfig {
        let defaults = ServerConfig::default();
        let section = self.server.clone().unwrap_or_default();

        ServerConfig {
            host: overrides.host.clone().or(section.host).unwrap_or(defaults.host),
            port: overrides.port.or(section.port).unwrap_or(defaults.port),
        }
    }
}
