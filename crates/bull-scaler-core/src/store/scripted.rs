use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::traits::QueueStore;
use crate::error::{StoreError, StoreResult};

/// What a [`ScriptedStore`] answers for one key.
#[derive(Debug, Clone)]
pub enum Reply {
    Len(i64),
    Fail(String),
    /// Answer `Len` only after the delay has passed.
    Slow(Duration, i64),
}

/// In-memory [`QueueStore`] with per-key scripted replies. Unknown keys have
/// length 0, like a missing Redis list. Counts every store round-trip.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    replies: Mutex<HashMap<String, Reply>>,
    ping_error: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_len(self, key: &str, len: i64) -> Self {
        self.set(key, Reply::Len(len));
        self
    }

    pub fn with_reply(self, key: &str, reply: Reply) -> Self {
        self.set(key, reply);
        self
    }

    pub fn set(&self, key: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert(key.to_string(), reply);
    }

    pub fn fail_ping(&self, message: &str) {
        *self.ping_error.lock().unwrap() = Some(message.to_string());
    }

    /// Number of `list_len` and `ping` calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueStore for ScriptedStore {
    async fn list_len(&self, key: &str) -> StoreResult<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or(Reply::Len(0));
        match reply {
            Reply::Len(len) => Ok(len),
            Reply::Fail(message) => Err(StoreError::Redis(message)),
            Reply::Slow(delay, len) => {
                tokio::time::sleep(delay).await;
                Ok(len)
            }
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.ping_error.lock().unwrap().clone() {
            Some(message) => Err(StoreError::Redis(message)),
            None => Ok(()),
        }
    }
}
