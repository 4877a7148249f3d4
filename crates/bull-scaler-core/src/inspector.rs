use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::QueueDepth;
use crate::error::{ScalerResult, StoreError};
use crate::metadata::QueuePair;
use crate::store::QueueStore;

/// Reads the current depth of a [`QueuePair`].
///
/// Every read is bounded by the store response timeout. Dropping the returned
/// future abandons both reads. Failures are returned as-is: the orchestrator
/// polls again on its own schedule, so nothing is retried here.
#[derive(Clone)]
pub struct QueueInspector {
    store: Arc<dyn QueueStore>,
    response_timeout: Duration,
}

impl QueueInspector {
    pub fn new(store: Arc<dyn QueueStore>, response_timeout: Duration) -> Self {
        Self {
            store,
            response_timeout,
        }
    }

    /// Read both lists. The reads run concurrently and are not atomic with
    /// respect to each other. If either read fails the whole inspection fails.
    pub async fn depth(&self, queues: &QueuePair) -> ScalerResult<QueueDepth> {
        let (pending, in_flight) = tokio::try_join!(
            self.read(&queues.pending),
            self.read(&queues.in_flight),
        )?;
        Ok(QueueDepth::new(pending, in_flight))
    }

    async fn read(&self, key: &str) -> ScalerResult<i64> {
        match tokio::time::timeout(self.response_timeout, self.store.list_len(key)).await {
            Ok(Ok(len)) if len >= 0 => {
                debug!(key, len, "read list length");
                Ok(len)
            }
            Ok(Ok(len)) => Err(StoreError::UnexpectedReply {
                key: key.to_string(),
                reply: len.to_string(),
            }
            .into()),
            Ok(Err(err)) => {
                warn!(key, error = %err, "list length read failed");
                Err(err.into())
            }
            Err(_) => {
                let timeout_ms = u64::try_from(self.response_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(key, timeout_ms, "list length read timed out");
                Err(StoreError::Timeout(timeout_ms).into())
            }
        }
    }
}
