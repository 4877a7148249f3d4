pub mod config;
pub mod engine;
pub mod error;
pub mod inspector;
pub mod metadata;
pub mod scaler;
pub mod store;
pub mod telemetry;

pub use config::{ScalerConfig, ServerConfig, StoreConfig};
pub use engine::QueueDepth;
pub use error::{ConfigError, ConfigResult, ScalerError, ScalerResult, StoreError, StoreResult};
pub use inspector::QueueInspector;
pub use metadata::{QueuePair, ScalerMetadata};
pub use scaler::{MetricSample, MetricSpec, ScaleTarget, Scaler, METRIC_NAME, TARGET_SIZE};
pub use store::{QueueStore, RedisStore};
