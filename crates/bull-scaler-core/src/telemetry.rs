use tracing_subscriber::EnvFilter;

/// Overrides the build-dependent log format: `json` or `pretty`.
pub const LOG_FORMAT_ENV: &str = "BULL_SCALER_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Pretty in debug builds, JSON in release builds, unless `requested`
    /// names a known format.
    pub fn select(requested: Option<&str>) -> Self {
        match requested.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | Some("text") => LogFormat::Pretty,
            _ if cfg!(debug_assertions) => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Initialize the tracing subscriber for structured logging.
///
/// The log level is controlled by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let requested = std::env::var(LOG_FORMAT_ENV).ok();

    match LogFormat::select(requested.as_deref()) {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .init(),
    }
}
