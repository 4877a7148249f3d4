use std::path::PathBuf;

/// Low-level store errors (connection, protocol, timeouts).
/// Store operations only fail with infrastructure errors, never domain errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(String),

    #[error("timed out after {0} ms")]
    Timeout(u64),

    #[error("unexpected reply for {key}: {reply}")]
    UnexpectedReply { key: String, reply: String },
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Redis(err.to_string())
    }
}

/// Per-call errors surfaced to the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ScalerError {
    #[error("missing required metadata: {0}")]
    MissingMetadata(String),

    #[error("maxPods must be a positive integer, got: {0:?}")]
    InvalidCeiling(String),

    #[error("queue store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for ScalerError {
    fn from(err: StoreError) -> Self {
        ScalerError::StoreUnavailable(err.to_string())
    }
}

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingValue(&'static str),

    #[error("REDIS_PORT must be a valid port number (1-65535), got: {0:?}")]
    InvalidPort(String),

    #[error("invalid listen address: {0:?}")]
    InvalidListenAddr(String),

    #[error("{field} must be greater than zero")]
    InvalidTimeout { field: &'static str },

    #[error("error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type ScalerResult<T> = std::result::Result<T, ScalerError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
