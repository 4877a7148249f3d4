use async_trait::async_trait;

use crate::error::StoreResult;

/// Read-only view of the list store. Implementations must be safe to share
/// across concurrently running calls without external locking.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Current length of the list stored at `key`. A missing key has length 0.
    async fn list_len(&self, key: &str) -> StoreResult<i64>;

    /// Round-trip liveness check.
    async fn ping(&self) -> StoreResult<()>;
}
