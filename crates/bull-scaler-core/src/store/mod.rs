mod redis;
#[cfg(any(test, feature = "testing"))]
mod scripted;
mod traits;

pub use self::redis::RedisStore;
#[cfg(any(test, feature = "testing"))]
pub use scripted::{Reply, ScriptedStore};
pub use traits::QueueStore;
