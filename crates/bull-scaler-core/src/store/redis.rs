use std::fmt;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use tracing::{debug, info};

use super::traits::QueueStore;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Redis-backed [`QueueStore`].
///
/// Wraps a multiplexed [`ConnectionManager`]: clones share one connection,
/// so concurrent calls pipeline over it instead of queueing behind a lock.
/// The manager re-establishes the connection by itself after a failure.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    addr: String,
}

impl RedisStore {
    /// Connect and verify the server answers `PING`. Both steps are bounded
    /// by the configured connect timeout. The first connection attempt is
    /// not retried, so a refused connection fails startup with its cause.
    #[tracing::instrument(skip_all, fields(addr = %config.addr()))]
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: RedisConnectionInfo::default(),
        };
        let client = redis::Client::open(info)?;
        let manager_config = ConnectionManagerConfig::new().set_number_of_retries(0);

        let conn = tokio::time::timeout(
            config.connect_timeout(),
            ConnectionManager::new_with_config(client, manager_config),
        )
        .await
        .map_err(|_| StoreError::Timeout(config.connect_timeout_ms))??;

        let store = Self {
            conn,
            addr: config.addr(),
        };

        tokio::time::timeout(config.connect_timeout(), store.ping())
            .await
            .map_err(|_| StoreError::Timeout(config.connect_timeout_ms))??;

        info!(addr = %store.addr, "connected to redis");
        Ok(store)
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("addr", &self.addr).finish()
    }
}

#[async_trait]
impl QueueStore for RedisStore {
    async fn list_len(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let len: i64 = conn.llen(key).await?;
        debug!(key, len, "LLEN");
        Ok(len)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!(%reply, "PING");
        if reply != "PONG" {
            return Err(StoreError::UnexpectedReply {
                key: "PING".to_string(),
                reply,
            });
        }
        Ok(())
    }
}
