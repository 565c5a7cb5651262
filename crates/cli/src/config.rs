//! Runtime configuration: TOML file, then environment, then CLI flags.
//!
//! ```toml
//! [ledger]
//! backend = "file"      # or "memory"
//! path = "ledger.json"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8081
//!
//! [log]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Config file picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "digicon.toml";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("error reading config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Backend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LedgerConfig {
    pub(crate) backend: Backend,
    pub(crate) path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            backend: Backend::File,
            path: PathBuf::from("ledger.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8081,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LogConfig {
    pub(crate) level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) ledger: LedgerConfig,
    pub(crate) server: ServerConfig,
    pub(crate) log: LogConfig,
}

impl Config {
    /// Load from `path`, or from `digicon.toml` if it exists, then apply
    /// `DIGICON_*` environment overrides.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from `DIGICON_LEDGER`, `DIGICON_BACKEND`,
    /// `DIGICON_HOST`, `DIGICON_PORT` and `DIGICON_LOG`. Empty values are
    /// ignored.
    pub(crate) fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

        if let Some(path) = get("DIGICON_LEDGER") {
            self.ledger.path = PathBuf::from(path);
        }
        if let Some(backend) = get("DIGICON_BACKEND") {
            self.ledger.backend = match backend.to_ascii_lowercase().as_str() {
                "file" => Backend::File,
                "memory" => Backend::Memory,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "DIGICON_BACKEND",
                        value: backend,
                    })
                }
            };
        }
        if let Some(host) = get("DIGICON_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("DIGICON_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "DIGICON_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(level) = get("DIGICON_LOG") {
            self.log.level = level;
        }
        Ok(())
    }
}
