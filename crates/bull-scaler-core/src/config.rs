use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, ConfigResult};

pub const CONFIG_PATH_ENV: &str = "BULL_SCALER_CONFIG";
pub const REDIS_HOST_ENV: &str = "REDIS_HOST";
pub const REDIS_PORT_ENV: &str = "REDIS_PORT";
pub const LISTEN_ADDR_ENV: &str = "LISTEN_ADDR";

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["bull-scaler.toml", "/etc/bull-scaler/bull-scaler.toml"];

/// Configuration as read from the TOML file, before environment overrides
/// and validation. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub server: RawServerConfig,
    pub store: RawStoreConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawServerConfig {
    pub listen_addr: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStoreConfig {
    pub host: Option<String>,
    pub port: Option<RawPort>,
    pub connect_timeout_ms: Option<u64>,
    pub response_timeout_ms: Option<u64>,
}

/// Ports may be written as `6379` or `"6379"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPort {
    Number(i64),
    Text(String),
}

impl RawPort {
    fn into_text(self) -> String {
        match self {
            RawPort::Number(n) => n.to_string(),
            RawPort::Text(s) => s,
        }
    }
}

/// Validated, immutable process configuration. Built once before serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalerConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

/// Redis connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout_ms: u64,
    /// Upper bound on a single list-length read.
    pub response_timeout_ms: u64,
}

impl StoreConfig {
    pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
    pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 5_000;

    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

impl ServerConfig {
    pub const DEFAULT_LISTEN_ADDR: &'static str = "0.0.0.0:8080";
}

impl ScalerConfig {
    /// Load from the config file (if any) and the process environment.
    pub fn load() -> ConfigResult<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let raw = match find_config_file(env) {
            Some(path) => load_file(&path)?,
            None => {
                info!("no config file found, using environment only");
                RawConfig::default()
            }
        };
        Self::from_sources(raw, env)
    }

    /// Apply environment overrides on top of `raw` and validate the result.
    /// Empty environment values are treated as unset.
    pub fn from_sources<F>(raw: RawConfig, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.is_empty());

        let listen_addr = lookup(LISTEN_ADDR_ENV)
            .or(raw.server.listen_addr)
            .unwrap_or_else(|| ServerConfig::DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(listen_addr.clone()))?;

        let host = lookup(REDIS_HOST_ENV)
            .or(raw.store.host.filter(|h| !h.is_empty()))
            .ok_or(ConfigError::MissingValue(REDIS_HOST_ENV))?;

        let port = lookup(REDIS_PORT_ENV)
            .or(raw.store.port.map(RawPort::into_text))
            .ok_or(ConfigError::MissingValue(REDIS_PORT_ENV))?;
        let port = parse_port(&port)?;

        let connect_timeout_ms = positive(
            raw.store.connect_timeout_ms,
            StoreConfig::DEFAULT_CONNECT_TIMEOUT_MS,
            "store.connect_timeout_ms",
        )?;
        let response_timeout_ms = positive(
            raw.store.response_timeout_ms,
            StoreConfig::DEFAULT_RESPONSE_TIMEOUT_MS,
            "store.response_timeout_ms",
        )?;

        Ok(Self {
            server: ServerConfig { listen_addr },
            store: StoreConfig {
                host,
                port,
                connect_timeout_ms,
                response_timeout_ms,
            },
        })
    }
}

/// Parse a TCP port. Only integers in 1..=65535 are valid.
pub fn parse_port(value: &str) -> ConfigResult<u16> {
    match value.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort(value.to_string())),
    }
}

fn positive(value: Option<u64>, default: u64, field: &'static str) -> ConfigResult<u64> {
    match value {
        None => Ok(default),
        Some(0) => Err(ConfigError::InvalidTimeout { field }),
        Some(v) => Ok(v),
    }
}

/// The explicit path from `BULL_SCALER_CONFIG`, else the first default
/// location that exists.
pub fn find_config_file<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = env(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    DEFAULT_CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

pub fn load_file(path: &Path) -> ConfigResult<RawConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loaded configuration");
    Ok(raw)
}
