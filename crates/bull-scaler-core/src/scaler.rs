use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::engine::{self, QueueDepth};
use crate::error::ScalerResult;
use crate::inspector::QueueInspector;
use crate::metadata::{QueuePair, ScalerMetadata};
use crate::store::QueueStore;

/// Name under which the queue-depth metric is reported.
pub const METRIC_NAME: &str = "bull_queue_length";

/// One unit of queue depth asks for one replica.
pub const TARGET_SIZE: i64 = 1;

/// The workload a call is about. Only used to correlate log lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaleTarget {
    pub namespace: String,
    pub name: String,
}

impl ScaleTarget {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ScaleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub metric_name: &'static str,
    pub target_size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSample {
    pub metric_name: &'static str,
    pub value: i64,
    /// The depth the value was computed from.
    pub depth: QueueDepth,
}

/// Answers the three scaler queries. Holds no per-workload state: every
/// call brings its own queue names and ceiling.
#[derive(Clone)]
pub struct Scaler {
    inspector: QueueInspector,
}

impl Scaler {
    pub fn new(store: Arc<dyn QueueStore>, response_timeout: Duration) -> Self {
        Self {
            inspector: QueueInspector::new(store, response_timeout),
        }
    }

    /// `true` when either list holds at least one job.
    pub async fn is_active(
        &self,
        target: &ScaleTarget,
        metadata: &HashMap<String, String>,
    ) -> ScalerResult<bool> {
        let queues = QueuePair::resolve(metadata)?;
        let depth = self.inspector.depth(&queues).await?;
        let active = engine::is_active(depth);
        info!(
            scale_target = %target,
            wait = depth.pending,
            active = depth.in_flight,
            total = depth.total(),
            result = active,
            "is_active"
        );
        Ok(active)
    }

    /// The constant metric descriptor. Independent of the caller.
    pub fn metric_spec(&self) -> MetricSpec {
        MetricSpec {
            metric_name: METRIC_NAME,
            target_size: TARGET_SIZE,
        }
    }

    /// Current queue depth capped at the caller's `maxPods`.
    pub async fn metrics(
        &self,
        target: &ScaleTarget,
        metadata: &HashMap<String, String>,
    ) -> ScalerResult<MetricSample> {
        let resolved = ScalerMetadata::resolve(metadata)?;
        let depth = self.inspector.depth(&resolved.queues).await?;
        let value = engine::metric_value(depth, resolved.ceiling);
        info!(
            scale_target = %target,
            wait = depth.pending,
            active = depth.in_flight,
            total = depth.total(),
            capped = value,
            max_pods = resolved.ceiling,
            "get_metrics"
        );
        Ok(MetricSample {
            metric_name: METRIC_NAME,
            value,
            depth,
        })
    }
}
